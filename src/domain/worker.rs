use serde::{Deserialize, Serialize};

pub const MIN_EFFICIENCY: f64 = 0.1;
pub const MAX_EFFICIENCY: f64 = 2.0;
pub const DEFAULT_EFFICIENCY: f64 = 1.0;

fn default_efficiency() -> f64 {
    DEFAULT_EFFICIENCY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerStatus {
    #[default]
    Idle,
    Busy,
    Cooldown,
    Offline,
}

impl WorkerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Busy => "BUSY",
            Self::Cooldown => "COOLDOWN",
            Self::Offline => "OFFLINE",
        }
    }
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerStats {
    pub tasks_completed: u64,
    pub ticks_active: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerState {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: WorkerStatus,
    #[serde(default)]
    pub current_task_id: Option<String>,
    #[serde(default = "default_efficiency")]
    pub efficiency: f64,
    #[serde(default)]
    pub stats: WorkerStats,
}

impl WorkerState {
    pub fn new(id: impl Into<String>, name: impl Into<String>, efficiency: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: WorkerStatus::Idle,
            current_task_id: None,
            efficiency,
            stats: WorkerStats::default(),
        }
    }

    // ticks_active survives a reset; everything else returns to a fresh idle worker.
    pub fn reset(&mut self) {
        self.status = WorkerStatus::Idle;
        self.current_task_id = None;
        self.stats.tasks_completed = 0;
    }
}

pub fn default_roster() -> Vec<WorkerState> {
    vec![
        WorkerState::new("w-01", "Worker Alpha", 1.2),
        WorkerState::new("w-02", "Worker Beta", 0.8),
        WorkerState::new("w-03", "Worker Gamma", 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_uppercase_wire_names() {
        let encoded = serde_json::to_string(&WorkerStatus::Cooldown).expect("encode");
        assert_eq!(encoded, "\"COOLDOWN\"");
        let decoded: WorkerStatus = serde_json::from_str("\"OFFLINE\"").expect("decode");
        assert_eq!(decoded, WorkerStatus::Offline);
    }

    #[test]
    fn reset_keeps_ticks_active() {
        let mut worker = WorkerState::new("w-09", "Worker Test", 1.0);
        worker.status = WorkerStatus::Busy;
        worker.current_task_id = Some("abc".to_string());
        worker.stats = WorkerStats {
            tasks_completed: 4,
            ticks_active: 90,
        };

        worker.reset();

        assert_eq!(worker.status, WorkerStatus::Idle);
        assert!(worker.current_task_id.is_none());
        assert_eq!(worker.stats.tasks_completed, 0);
        assert_eq!(worker.stats.ticks_active, 90);
    }

    #[test]
    fn worker_without_efficiency_decodes_at_default() {
        let worker: WorkerState = serde_json::from_str(r#"{"id":"w-07","name":"Worker Legacy"}"#)
            .expect("decode");
        assert_eq!(worker.efficiency, DEFAULT_EFFICIENCY);
        assert_eq!(worker.status, WorkerStatus::Idle);
    }

    #[test]
    fn default_roster_has_three_distinct_workers() {
        let roster = default_roster();
        let efficiencies = roster.iter().map(|w| w.efficiency).collect::<Vec<_>>();
        assert_eq!(efficiencies, vec![1.2, 0.8, 1.0]);
        assert!(roster.iter().all(|w| w.status == WorkerStatus::Idle));
    }
}
