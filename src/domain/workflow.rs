use crate::shared::time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAX_PROGRESS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    #[default]
    Generic,
    Document,
}

impl WorkflowType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Document => "document",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Self::Generic),
            "document" => Ok(Self::Document),
            _ => Err("workflow type must be one of: generic, document".to_string()),
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    #[default]
    Green,
    Yellow,
    Red,
}

impl Zone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            _ => Err("zone must be one of: green, yellow, red".to_string()),
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    Planned,
    Running,
    Waiting,
    Done,
}

impl WorkflowStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Running => "running",
            Self::Waiting => "waiting",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WorkflowOrigin {
    #[default]
    #[serde(rename = "SV")]
    SupervisorChat,
    #[serde(rename = "Wizard")]
    Wizard,
}

impl WorkflowOrigin {
    // Doubles as the audit log source tag for workflows created from this origin.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SupervisorChat => "SV",
            Self::Wizard => "Wizard",
        }
    }
}

impl std::fmt::Display for WorkflowOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: WorkflowType,
    #[serde(default)]
    pub zone: Zone,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub origin: WorkflowOrigin,
    #[serde(default)]
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub meta: Map<String, Value>,
    #[serde(default = "time::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "time::now")]
    pub updated_at: DateTime<Utc>,
}

/// Field-wise update merged onto an existing workflow; `None` leaves a field untouched.
///
/// Progress is clamped to `0..=100`, and a workflow that ends up `done` always
/// carries progress 100.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowPatch {
    pub name: Option<String>,
    pub kind: Option<WorkflowType>,
    pub zone: Option<Zone>,
    pub status: Option<WorkflowStatus>,
    pub origin: Option<WorkflowOrigin>,
    pub progress: Option<f64>,
    pub assigned_to: Option<Option<String>>,
    pub meta: Option<Map<String, Value>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkflowPatch {
    pub fn status(status: WorkflowStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn progress(progress: f64) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }

    pub fn claimed_by(worker_id: &str, at: DateTime<Utc>) -> Self {
        Self {
            status: Some(WorkflowStatus::Running),
            assigned_to: Some(Some(worker_id.to_string())),
            updated_at: Some(at),
            ..Self::default()
        }
    }

    pub fn completed(at: DateTime<Utc>) -> Self {
        Self {
            status: Some(WorkflowStatus::Done),
            progress: Some(MAX_PROGRESS),
            updated_at: Some(at),
            ..Self::default()
        }
    }

    pub fn apply_to(self, workflow: &mut Workflow) {
        if let Some(name) = self.name {
            workflow.name = name;
        }
        if let Some(kind) = self.kind {
            workflow.kind = kind;
        }
        if let Some(zone) = self.zone {
            workflow.zone = zone;
        }
        if let Some(status) = self.status {
            workflow.status = status;
        }
        if let Some(origin) = self.origin {
            workflow.origin = origin;
        }
        if let Some(progress) = self.progress {
            workflow.progress = if progress.is_nan() {
                workflow.progress
            } else {
                progress.clamp(0.0, MAX_PROGRESS)
            };
        }
        if let Some(assigned_to) = self.assigned_to {
            workflow.assigned_to = assigned_to;
        }
        if let Some(meta) = self.meta {
            workflow.meta = meta;
        }
        if let Some(updated_at) = self.updated_at {
            workflow.updated_at = updated_at;
        }
        if workflow.status == WorkflowStatus::Done {
            workflow.progress = MAX_PROGRESS;
        }
    }
}
