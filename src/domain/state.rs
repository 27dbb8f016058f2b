use super::{default_roster, LogEntry, SystemConfig, WorkerState, Workflow};
use crate::shared::time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    #[serde(default)]
    pub ticks: u64,
    #[serde(default = "time::now")]
    pub last_save: DateTime<Utc>,
}

impl Default for EngineStats {
    fn default() -> Self {
        Self {
            ticks: 0,
            last_save: time::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub config: Option<SystemConfig>,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default = "default_roster")]
    pub workers: Vec<WorkerState>,
    #[serde(default)]
    pub stats: EngineStats,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_workers(default_roster())
    }
}

impl AppState {
    pub fn with_workers(workers: Vec<WorkerState>) -> Self {
        Self {
            config: None,
            workflows: Vec::new(),
            logs: Vec::new(),
            workers,
            stats: EngineStats::default(),
        }
    }

    pub fn workflow(&self, id: &str) -> Option<&Workflow> {
        self.workflows.iter().find(|workflow| workflow.id == id)
    }

    pub fn worker(&self, id: &str) -> Option<&WorkerState> {
        self.workers.iter().find(|worker| worker.id == id)
    }
}
