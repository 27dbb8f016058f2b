use crate::app::command_support::{map_config_err, open_core, status_lines};
use crate::config::{bootstrap_state_root, save_settings, Settings, StatePaths};
use crate::store;
use crate::supervisor::{self, SupervisorCommand};

pub fn cmd_init(paths: &StatePaths) -> Result<String, String> {
    bootstrap_state_root(paths).map_err(map_config_err)?;
    let settings_path = paths.settings_file();
    if settings_path.exists() {
        return Ok(format!(
            "state root ready\nstate_root={}\nconfig={} (kept existing)",
            paths.root.display(),
            settings_path.display()
        ));
    }
    let written = save_settings(paths, &Settings::default()).map_err(map_config_err)?;
    Ok(format!(
        "state root initialized\nstate_root={}\nconfig={}",
        paths.root.display(),
        written.display()
    ))
}

pub fn cmd_status(paths: &StatePaths) -> Result<String, String> {
    let core = open_core(paths)?;
    let mut lines = vec![format!("state_root={}", paths.root.display())];
    lines.extend(status_lines(store::lock(core.store()).state()));
    Ok(lines.join("\n"))
}

pub fn cmd_reset(paths: &StatePaths) -> Result<String, String> {
    let core = open_core(paths)?;
    let reply = supervisor::execute(&SupervisorCommand::Reset, core.engine());
    Ok(reply.text)
}
