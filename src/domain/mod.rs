pub mod log;
pub mod profile;
pub mod state;
pub mod worker;
pub mod workflow;

pub use log::{LogEntry, LogLevel, LOG_CAPACITY};
pub use profile::{ProfileDraft, SystemConfig, MAX_AUTONOMY_LEVEL, MIN_AUTONOMY_LEVEL};
pub use state::{AppState, EngineStats};
pub use worker::{
    default_roster, WorkerState, WorkerStats, WorkerStatus, DEFAULT_EFFICIENCY, MAX_EFFICIENCY,
    MIN_EFFICIENCY,
};
pub use workflow::{
    Workflow, WorkflowOrigin, WorkflowPatch, WorkflowStatus, WorkflowType, Zone,
    MAX_PROGRESS,
};
