//! Sole owner and writer of [`AppState`].
//!
//! Every mutation publishes `STATE:CHANGED` with the full state. All of them
//! except the tick counter bump and pure worker bookkeeping also persist a
//! snapshot to the configured slot first.

pub mod persistence;

use crate::agent::Decision;
use crate::bus::{Event, EventBus, Topic};
use crate::domain::{
    AppState, LogEntry, LogLevel, SystemConfig, WorkerState, WorkerStatus, Workflow,
    WorkflowOrigin, WorkflowPatch, WorkflowStatus, WorkflowType, Zone, LOG_CAPACITY,
};
use crate::shared::errors::StoreError;
use crate::shared::{ids, time};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use persistence::{FileSlot, MemorySlot, SnapshotSlot, STORAGE_KEY};

pub type SharedStore = Arc<Mutex<Store>>;

// A panic mid-tick poisons the mutex; the state it guards is still the latest
// consistent one the store produced, so keep using it.
pub fn lock(store: &SharedStore) -> MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkflow {
    pub name: String,
    pub kind: WorkflowType,
    pub zone: Zone,
    pub origin: WorkflowOrigin,
    pub meta: Map<String, Value>,
}

impl NewWorkflow {
    pub fn new(
        name: impl Into<String>,
        kind: WorkflowType,
        zone: Zone,
        origin: WorkflowOrigin,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            zone,
            origin,
            meta: Map::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Applied,
    Rejected,
}

pub struct Store {
    state: AppState,
    bus: Arc<EventBus>,
    slot: Box<dyn SnapshotSlot>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("slot", &self.slot.key())
            .field("ticks", &self.state.stats.ticks)
            .field("workflows", &self.state.workflows.len())
            .field("logs", &self.state.logs.len())
            .finish()
    }
}

impl Store {
    pub fn open(slot: Box<dyn SnapshotSlot>, bus: Arc<EventBus>, roster: Vec<WorkerState>) -> Self {
        let defaults = AppState::with_workers(roster);
        let state = persistence::load_or_default(slot.as_ref(), &defaults);
        tracing::debug!(
            slot = slot.key(),
            workflows = state.workflows.len(),
            ticks = state.stats.ticks,
            "store opened"
        );
        Self { state, bus, slot }
    }

    pub fn in_memory(bus: Arc<EventBus>, roster: Vec<WorkerState>) -> Self {
        Self::open(Box::new(MemorySlot::new()), bus, roster)
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> AppState {
        self.state.clone()
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn workflow(&self, id: &str) -> Option<&Workflow> {
        self.state.workflow(id)
    }

    pub fn worker(&self, id: &str) -> Option<&WorkerState> {
        self.state.worker(id)
    }

    pub fn increment_tick(&mut self) -> u64 {
        self.state.stats.ticks += 1;
        self.notify_state_changed();
        self.state.stats.ticks
    }

    pub fn set_config(&mut self, config: SystemConfig) {
        let message = format!("Configuration applied: {}", config.profile_name);
        self.state.config = Some(config);
        self.push_log("WIZARD", LogLevel::Success, message, None);
        self.persist();
    }

    pub fn add_workflow(&mut self, draft: NewWorkflow) -> String {
        let now = time::now();
        let id = ids::generate_workflow_id(|candidate| {
            self.state.workflows.iter().any(|w| w.id == candidate)
        });
        let message = format!("New Workflow created: {}", draft.name);
        let source = draft.origin.as_str();
        self.state.workflows.insert(
            0,
            Workflow {
                id: id.clone(),
                name: draft.name,
                kind: draft.kind,
                zone: draft.zone,
                status: WorkflowStatus::Planned,
                origin: draft.origin,
                progress: 0.0,
                assigned_to: None,
                meta: draft.meta,
                created_at: now,
                updated_at: now,
            },
        );
        self.push_log(source, LogLevel::Info, message, None);
        self.persist();
        id
    }

    /// Merges `patch` into the workflow with `id`. Unknown ids change nothing but still notify.
    pub fn update_workflow(&mut self, id: &str, patch: WorkflowPatch) -> bool {
        let Some(workflow) = self.workflow_mut(id) else {
            self.notify_state_changed();
            return false;
        };
        patch.apply_to(workflow);
        self.persist();
        true
    }

    pub fn add_log(&mut self, source: &str, level: LogLevel, message: impl Into<String>) -> LogEntry {
        let entry = self.push_log(source, level, message.into(), None);
        self.persist();
        entry
    }

    pub fn add_log_with_context(
        &mut self,
        source: &str,
        level: LogLevel,
        message: impl Into<String>,
        context: impl Into<String>,
    ) -> LogEntry {
        let entry = self.push_log(source, level, message.into(), Some(context.into()));
        self.persist();
        entry
    }

    /// Full simulation reset: clears the audit log and the workflow
    /// collection and returns every worker to idle with no task and zero
    /// completed tasks. Ticks active and the tick counter are kept.
    pub fn reset_simulation(&mut self) {
        self.state.logs.clear();
        self.state.workflows.clear();
        for worker in &mut self.state.workers {
            worker.reset();
        }
        self.persist();
    }

    pub fn apply_decision(
        &mut self,
        worker_id: &str,
        decision: &Decision,
    ) -> Result<DecisionOutcome, StoreError> {
        let index = self
            .state
            .workers
            .iter()
            .position(|worker| worker.id == worker_id)
            .ok_or_else(|| StoreError::UnknownWorker {
                worker_id: worker_id.to_string(),
            })?;
        if matches!(decision, Decision::Skip) {
            return Ok(DecisionOutcome::Applied);
        }
        self.state.workers[index].stats.ticks_active += 1;

        let outcome = match decision {
            Decision::Skip | Decision::Wait => DecisionOutcome::Applied,
            Decision::Claim {
                workflow_id,
                progress,
            } => self.claim(index, workflow_id, *progress),
            Decision::Release => {
                self.release(index);
                DecisionOutcome::Applied
            }
            Decision::Advance {
                workflow_id,
                progress,
            } => self.advance(index, workflow_id, *progress),
            Decision::Complete { workflow_id } => self.complete(index, workflow_id),
            Decision::Recover => {
                self.state.workers[index].status = WorkerStatus::Idle;
                self.notify_state_changed();
                DecisionOutcome::Applied
            }
        };
        Ok(outcome)
    }

    fn claim(&mut self, index: usize, workflow_id: &str, progress: f64) -> DecisionOutcome {
        if self.state.workers[index].status != WorkerStatus::Idle {
            return DecisionOutcome::Rejected;
        }
        let Some(task_name) = self
            .state
            .workflow(workflow_id)
            .filter(|workflow| workflow.status == WorkflowStatus::Planned)
            .map(|workflow| workflow.name.clone())
        else {
            return DecisionOutcome::Rejected;
        };

        let now = time::now();
        let worker = &mut self.state.workers[index];
        worker.status = WorkerStatus::Busy;
        worker.current_task_id = Some(workflow_id.to_string());
        let worker_id = worker.id.clone();
        let worker_name = worker.name.clone();

        if let Some(workflow) = self.workflow_mut(workflow_id) {
            WorkflowPatch::claimed_by(&worker_id, now).apply_to(workflow);
            WorkflowPatch::progress(progress).apply_to(workflow);
        }
        self.push_log(
            &worker_name,
            LogLevel::Info,
            format!("Accepted task: {task_name}"),
            None,
        );
        self.persist();
        DecisionOutcome::Applied
    }

    fn advance(&mut self, index: usize, workflow_id: &str, progress: f64) -> DecisionOutcome {
        if !self.holds_live_task(index, workflow_id) {
            self.release(index);
            return DecisionOutcome::Rejected;
        }
        if let Some(workflow) = self.workflow_mut(workflow_id) {
            let floor = workflow.progress;
            WorkflowPatch::progress(progress.max(floor)).apply_to(workflow);
        }
        self.persist();
        DecisionOutcome::Applied
    }

    fn complete(&mut self, index: usize, workflow_id: &str) -> DecisionOutcome {
        if !self.holds_live_task(index, workflow_id) {
            self.release(index);
            return DecisionOutcome::Rejected;
        }
        let now = time::now();
        let mut task_name = String::new();
        if let Some(workflow) = self.workflow_mut(workflow_id) {
            WorkflowPatch::completed(now).apply_to(workflow);
            task_name = workflow.name.clone();
        }

        let worker = &mut self.state.workers[index];
        worker.stats.tasks_completed += 1;
        worker.status = WorkerStatus::Cooldown;
        worker.current_task_id = None;
        let worker_name = worker.name.clone();

        self.push_log(
            &worker_name,
            LogLevel::Success,
            format!("Completed task: {task_name}"),
            None,
        );
        self.persist();
        DecisionOutcome::Applied
    }

    fn release(&mut self, index: usize) {
        let worker = &mut self.state.workers[index];
        worker.status = WorkerStatus::Idle;
        worker.current_task_id = None;
        self.notify_state_changed();
    }

    fn holds_live_task(&self, index: usize, workflow_id: &str) -> bool {
        self.state.workers[index].current_task_id.as_deref() == Some(workflow_id)
            && self
                .state
                .workflow(workflow_id)
                .is_some_and(|workflow| workflow.status == WorkflowStatus::Running)
    }

    fn workflow_mut(&mut self, id: &str) -> Option<&mut Workflow> {
        self.state
            .workflows
            .iter_mut()
            .find(|workflow| workflow.id == id)
    }

    fn push_log(
        &mut self,
        source: &str,
        level: LogLevel,
        message: String,
        context: Option<String>,
    ) -> LogEntry {
        let at = time::now();
        let entry = LogEntry {
            id: ids::generate_log_id(at),
            source: source.to_string(),
            level,
            message,
            context,
            timestamp: at,
        };
        self.state.logs.insert(0, entry.clone());
        self.state.logs.truncate(LOG_CAPACITY);
        self.bus.publish(Event::LogAdded(entry.clone()));
        entry
    }

    fn persist(&mut self) {
        self.state.stats.last_save = time::now();
        let saved = persistence::encode_snapshot(self.slot.key(), &self.state)
            .and_then(|blob| self.slot.save(&blob));
        if let Err(err) = saved {
            tracing::warn!(error = %err, "failed to persist state snapshot; keeping in-memory state");
        }
        self.notify_state_changed();
    }

    fn notify_state_changed(&self) {
        if self.bus.has_subscribers(Topic::StateChanged) {
            self.bus
                .publish(Event::StateChanged(Arc::new(self.state.clone())));
        }
    }
}
