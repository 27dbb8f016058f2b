use crate::app::command_support::{flag_value, format_log_line, open_core};
use crate::config::StatePaths;
use crate::domain::LOG_CAPACITY;
use crate::store;

pub fn cmd_logs(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    let limit = match flag_value(args, "--limit")? {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| format!("invalid log limit `{raw}`"))?,
        None => LOG_CAPACITY,
    };

    let core = open_core(paths)?;
    let store = store::lock(core.store());
    let logs = &store.state().logs;
    if logs.is_empty() {
        return Ok("no log entries".to_string());
    }
    Ok(logs
        .iter()
        .take(limit)
        .map(format_log_line)
        .collect::<Vec<_>>()
        .join("\n"))
}
