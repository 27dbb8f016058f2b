use crate::app::cli::{help_text, parse_cli_verb, CliVerb};
use crate::app::command_support::ensure_state_root;
use crate::config::StatePaths;

pub mod chat;
pub mod configure;
pub mod logs;
pub mod state;
pub mod workflows;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }
    let paths = ensure_state_root()?;
    run_cli_at(&paths, args)
}

pub fn run_cli_at(paths: &StatePaths, args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Init => state::cmd_init(paths),
        CliVerb::Run => chat::cmd_run(paths),
        CliVerb::Status => state::cmd_status(paths),
        CliVerb::Workflows => workflows::cmd_workflows(paths),
        CliVerb::Logs => logs::cmd_logs(paths, &args[1..]),
        CliVerb::Workflow => workflows::cmd_workflow(paths, &args[1..]),
        CliVerb::Configure => configure::cmd_configure(paths, &args[1..]),
        CliVerb::Reset => state::cmd_reset(paths),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
