//! Per-worker decision logic.
//!
//! `think` is a pure function of one worker record and the current workflow
//! collection. It proposes a [`Decision`]; only the store applies it.

use crate::domain::{WorkerState, WorkerStatus, Workflow, WorkflowStatus, MAX_PROGRESS};
use crate::shared::random::Dice;

pub const BASE_PROGRESS_PER_TICK: f64 = 2.0;
pub const COOLDOWN_RECOVERY_CHANCE: f64 = 0.10;

#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// Offline worker: nothing happens, not even the activity counter.
    Skip,
    /// Counts an active tick and changes nothing else.
    Wait,
    /// Take a planned workflow and do the first unit of work on it.
    Claim { workflow_id: String, progress: f64 },
    /// Drop a task that no longer resolves to a running workflow.
    Release,
    Advance { workflow_id: String, progress: f64 },
    Complete { workflow_id: String },
    /// Leave cooldown.
    Recover,
}

pub fn progress_increment(efficiency: f64) -> f64 {
    BASE_PROGRESS_PER_TICK * efficiency
}

pub fn think(worker: &WorkerState, workflows: &[Workflow], dice: &mut dyn Dice) -> Decision {
    match worker.status {
        WorkerStatus::Offline => Decision::Skip,
        WorkerStatus::Idle => look_for_work(worker, workflows),
        WorkerStatus::Busy => work(worker, workflows),
        WorkerStatus::Cooldown => {
            if dice.roll() < COOLDOWN_RECOVERY_CHANCE {
                Decision::Recover
            } else {
                Decision::Wait
            }
        }
    }
}

// Collection order is newest-first, so the newest planned workflow wins.
fn look_for_work(worker: &WorkerState, workflows: &[Workflow]) -> Decision {
    match workflows
        .iter()
        .find(|workflow| workflow.status == WorkflowStatus::Planned)
    {
        Some(workflow) => Decision::Claim {
            workflow_id: workflow.id.clone(),
            progress: progress_increment(worker.efficiency).min(MAX_PROGRESS),
        },
        None => Decision::Wait,
    }
}

fn work(worker: &WorkerState, workflows: &[Workflow]) -> Decision {
    let Some(task_id) = worker.current_task_id.as_deref() else {
        return Decision::Release;
    };
    let Some(workflow) = workflows
        .iter()
        .find(|workflow| workflow.id == task_id)
        .filter(|workflow| workflow.status == WorkflowStatus::Running)
    else {
        return Decision::Release;
    };

    let progress = (workflow.progress + progress_increment(worker.efficiency)).min(MAX_PROGRESS);
    if progress >= MAX_PROGRESS {
        Decision::Complete {
            workflow_id: workflow.id.clone(),
        }
    } else {
        Decision::Advance {
            workflow_id: workflow.id.clone(),
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{WorkflowOrigin, WorkflowType, Zone};
    use crate::shared::random::ScriptedDice;
    use crate::shared::time;
    use serde_json::Map;

    fn workflow(id: &str, status: WorkflowStatus, progress: f64) -> Workflow {
        let now = time::now();
        Workflow {
            id: id.to_string(),
            name: format!("task {id}"),
            kind: WorkflowType::Generic,
            zone: Zone::Green,
            status,
            origin: WorkflowOrigin::SupervisorChat,
            progress,
            assigned_to: None,
            meta: Map::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn busy_on(task: &str, efficiency: f64) -> WorkerState {
        let mut worker = WorkerState::new("w-01", "Worker Alpha", efficiency);
        worker.status = WorkerStatus::Busy;
        worker.current_task_id = Some(task.to_string());
        worker
    }

    #[test]
    fn offline_worker_skips_without_rolling() {
        let mut worker = WorkerState::new("w-09", "Dormant", 1.0);
        worker.status = WorkerStatus::Offline;
        let mut dice = ScriptedDice::always(0.0);
        let planned = [workflow("a", WorkflowStatus::Planned, 0.0)];

        assert_eq!(think(&worker, &planned, &mut dice), Decision::Skip);
    }

    #[test]
    fn idle_worker_claims_first_planned_in_collection_order() {
        let worker = WorkerState::new("w-01", "Worker Alpha", 1.2);
        let workflows = [
            workflow("newest", WorkflowStatus::Running, 10.0),
            workflow("middle", WorkflowStatus::Planned, 0.0),
            workflow("oldest", WorkflowStatus::Planned, 0.0),
        ];

        let decision = think(&worker, &workflows, &mut ScriptedDice::always(0.5));
        assert_eq!(
            decision,
            Decision::Claim {
                workflow_id: "middle".to_string(),
                progress: 2.4,
            }
        );
    }

    #[test]
    fn idle_worker_without_planned_work_waits() {
        let worker = WorkerState::new("w-01", "Worker Alpha", 1.0);
        let workflows = [workflow("done", WorkflowStatus::Done, 100.0)];
        assert_eq!(
            think(&worker, &workflows, &mut ScriptedDice::always(0.5)),
            Decision::Wait
        );
    }

    #[test]
    fn busy_worker_advances_by_twice_its_efficiency() {
        let worker = busy_on("a", 0.8);
        let workflows = [workflow("a", WorkflowStatus::Running, 10.0)];
        match think(&worker, &workflows, &mut ScriptedDice::always(0.5)) {
            Decision::Advance {
                workflow_id,
                progress,
            } => {
                assert_eq!(workflow_id, "a");
                assert!((progress - 11.6).abs() < 1e-9);
            }
            other => panic!("unexpected decision {other:?}"),
        }
    }

    #[test]
    fn busy_worker_completes_when_increment_reaches_the_cap() {
        let worker = busy_on("a", 1.0);
        let workflows = [workflow("a", WorkflowStatus::Running, 99.0)];
        assert_eq!(
            think(&worker, &workflows, &mut ScriptedDice::always(0.5)),
            Decision::Complete {
                workflow_id: "a".to_string()
            }
        );
    }

    #[test]
    fn busy_worker_releases_vanished_or_stopped_task() {
        let missing = busy_on("gone", 1.0);
        assert_eq!(
            think(&missing, &[], &mut ScriptedDice::always(0.5)),
            Decision::Release
        );

        let waiting = busy_on("a", 1.0);
        let workflows = [workflow("a", WorkflowStatus::Waiting, 40.0)];
        assert_eq!(
            think(&waiting, &workflows, &mut ScriptedDice::always(0.5)),
            Decision::Release
        );

        let mut untracked = busy_on("a", 1.0);
        untracked.current_task_id = None;
        assert_eq!(
            think(&untracked, &workflows, &mut ScriptedDice::always(0.5)),
            Decision::Release
        );
    }

    #[test]
    fn cooldown_recovers_only_below_the_threshold() {
        let mut worker = WorkerState::new("w-01", "Worker Alpha", 1.0);
        worker.status = WorkerStatus::Cooldown;
        let mut dice = ScriptedDice::new([0.5, 0.1, 0.0999]);

        assert_eq!(think(&worker, &[], &mut dice), Decision::Wait);
        assert_eq!(think(&worker, &[], &mut dice), Decision::Wait);
        assert_eq!(think(&worker, &[], &mut dice), Decision::Recover);
    }
}
