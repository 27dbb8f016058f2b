use crate::app::human_core::HumanCore;
use crate::config::{
    bootstrap_state_root, default_state_root_path, load_settings as config_load_settings,
    ConfigError, Settings, StatePaths,
};
use crate::domain::{AppState, LogEntry, WorkerState, Workflow, WorkflowStatus};
use std::io::Write;

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

pub fn ensure_state_root() -> Result<StatePaths, String> {
    let root = default_state_root_path().map_err(map_config_err)?;
    let paths = StatePaths::new(root);
    bootstrap_state_root(&paths).map_err(map_config_err)?;
    Ok(paths)
}

pub fn load_settings(paths: &StatePaths) -> Result<Settings, String> {
    config_load_settings(paths).map_err(map_config_err)
}

pub fn open_core(paths: &StatePaths) -> Result<HumanCore, String> {
    bootstrap_state_root(paths).map_err(map_config_err)?;
    let settings = load_settings(paths)?;
    Ok(HumanCore::open(paths, settings))
}

pub fn write_line<W: Write>(output: &mut W, line: &str) -> Result<(), String> {
    writeln!(output, "{line}").map_err(|e| format!("failed to write output: {e}"))?;
    output
        .flush()
        .map_err(|e| format!("failed to flush output: {e}"))
}

/// Returns the value following `flag`, erroring when the flag is last.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>, String> {
    match args.iter().position(|arg| arg == flag) {
        None => Ok(None),
        Some(index) => args
            .get(index + 1)
            .map(|value| Some(value.as_str()))
            .ok_or_else(|| format!("missing value for `{flag}`")),
    }
}

pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(format!("expected true or false, got `{other}`")),
    }
}

pub fn format_workflow_line(workflow: &Workflow) -> String {
    format!(
        "{} status={} progress={:.1} zone={} type={} origin={} assigned={} name={}",
        workflow.id,
        workflow.status,
        workflow.progress,
        workflow.zone,
        workflow.kind,
        workflow.origin,
        workflow.assigned_to.as_deref().unwrap_or("-"),
        workflow.name
    )
}

pub fn format_log_line(entry: &LogEntry) -> String {
    let mut line = format!(
        "{} [{}] {}: {}",
        entry.timestamp.to_rfc3339(),
        entry.source,
        entry.level,
        entry.message
    );
    if let Some(context) = entry.context.as_deref() {
        line.push_str(&format!(" ({context})"));
    }
    line
}

pub fn format_worker_line(worker: &WorkerState) -> String {
    format!(
        "worker={} name=\"{}\" status={} task={} efficiency={} completed={} ticks_active={}",
        worker.id,
        worker.name,
        worker.status,
        worker.current_task_id.as_deref().unwrap_or("-"),
        worker.efficiency,
        worker.stats.tasks_completed,
        worker.stats.ticks_active
    )
}

pub fn status_lines(state: &AppState) -> Vec<String> {
    let count = |status: WorkflowStatus| {
        state
            .workflows
            .iter()
            .filter(|workflow| workflow.status == status)
            .count()
    };
    let mut lines = vec![
        format!("ticks={}", state.stats.ticks),
        format!("last_save={}", state.stats.last_save.to_rfc3339()),
        match &state.config {
            Some(config) => format!(
                "profile=\"{}\" autonomy={} confirm_critical={}",
                config.profile_name, config.autonomy_level, config.require_confirmation_for_critical
            ),
            None => "profile=none".to_string(),
        },
        format!(
            "workflows={} planned={} running={} waiting={} done={}",
            state.workflows.len(),
            count(WorkflowStatus::Planned),
            count(WorkflowStatus::Running),
            count(WorkflowStatus::Waiting),
            count(WorkflowStatus::Done)
        ),
        format!("logs={}", state.logs.len()),
    ];
    lines.extend(state.workers.iter().map(format_worker_line));
    lines
}
