use humancore::app::{self, command_support};
use humancore::config::StatePaths;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "HUMANCORE_LOG";

fn output_header() -> &'static str {
    "HumanCore\nSimulated autonomous worker pool with a supervisor chat."
}

// Diagnostics go to a file so they never interleave with the chat on stdout.
fn init_diagnostics(paths: &StatePaths) -> Result<(), String> {
    let path = paths.runtime_log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| format!("failed to install diagnostics: {e}"))
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        println!("{}\n", output_header());
        println!("{}", app::run_cli(args)?);
        return Ok(());
    }
    let paths = command_support::ensure_state_root()?;
    init_diagnostics(&paths)?;
    tracing::debug!(verb = %args[0], root = %paths.root.display(), "dispatching command");
    let output = app::run_cli_at(&paths, args)?;
    println!("{output}");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
