use humancore::app::command_handlers::chat::run_supervisor_session;
use humancore::app::{run_cli_at, HumanCore};
use humancore::config::{save_settings, Settings, StatePaths};
use humancore::shared::random::ScriptedDice;
use humancore::store::{self, MemorySlot, STORAGE_KEY};
use std::io::Cursor;
use tempfile::tempdir;

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|arg| arg.to_string()).collect()
}

fn quiet_settings() -> Settings {
    Settings {
        tick_interval_ms: 10_000,
        thinking_delay_ms: 0,
        upload_delay_ms: 0,
        ..Settings::default()
    }
}

#[test]
fn app_cli_unknown_verb_is_an_error_and_empty_args_print_help() {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path());

    let err = run_cli_at(&paths, args(&["launch"])).expect_err("unknown verb");
    assert!(err.contains("unknown command `launch`"));

    let help = run_cli_at(&paths, Vec::new()).expect("help");
    assert!(help.contains("workflow add <name>"));
}

#[test]
fn app_cli_init_writes_default_config_once() {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path());

    let first = run_cli_at(&paths, args(&["init"])).expect("init");
    assert!(first.contains("state root initialized"));
    let written = Settings::from_path(&paths.settings_file()).expect("config readable");
    assert_eq!(written, Settings::default());

    let second = run_cli_at(&paths, args(&["init"])).expect("init again");
    assert!(second.contains("kept existing"));
    assert!(paths.snapshot_dir().is_dir());
    assert!(paths.logs_dir().is_dir());
}

#[test]
fn app_cli_workflow_add_then_list_persists_across_invocations() {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path());

    let created = run_cli_at(
        &paths,
        args(&["workflow", "add", "Tax", "Filing", "--zone", "red", "--type", "document"]),
    )
    .expect("workflow add");
    assert!(created.contains("name=Tax Filing"));
    assert!(created.contains("zone=red"));
    assert!(paths.snapshot_path(STORAGE_KEY).exists());

    let listed = run_cli_at(&paths, args(&["workflows"])).expect("workflows");
    assert!(listed.contains("status=planned"));
    assert!(listed.contains("type=document"));
    assert!(listed.contains("name=Tax Filing"));

    let logs = run_cli_at(&paths, args(&["logs", "--limit", "1"])).expect("logs");
    assert!(logs.contains("[SV] info: New Workflow created: Tax Filing"));
}

#[test]
fn app_cli_workflow_add_rejects_bad_zone_and_missing_name() {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path());

    assert!(run_cli_at(&paths, args(&["workflow", "add", "x", "--zone", "blue"])).is_err());
    assert!(run_cli_at(&paths, args(&["workflow", "add", "--zone", "red"])).is_err());
    assert!(run_cli_at(&paths, args(&["workflow", "remove", "x"])).is_err());
}

#[test]
fn app_cli_configure_applies_profile_and_status_reports_it() {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path());

    let applied = run_cli_at(&paths, args(&["configure", "Night Shift", "4", "false"]))
        .expect("configure");
    assert!(applied.contains("profile=Night Shift"));

    let status = run_cli_at(&paths, args(&["status"])).expect("status");
    assert!(status.contains("profile=\"Night Shift\" autonomy=4 confirm_critical=false"));
    assert!(status.contains("worker=w-02 name=\"Worker Beta\" status=IDLE"));

    assert!(run_cli_at(&paths, args(&["configure", "Too Bold", "9", "true"])).is_err());
}

#[test]
fn app_cli_reset_clears_persisted_workflows() {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path());
    run_cli_at(&paths, args(&["workflow", "add", "Ephemeral"])).expect("add");

    let reply = run_cli_at(&paths, args(&["reset"])).expect("reset");
    assert_eq!(reply, "System reset initiated.");
    assert_eq!(
        run_cli_at(&paths, args(&["workflows"])).expect("workflows"),
        "no workflows"
    );
}

#[test]
fn app_cli_invalid_config_file_surfaces_error() {
    let temp = tempdir().expect("tempdir");
    let paths = StatePaths::new(temp.path());
    save_settings(&paths, &Settings::default()).expect("save");
    std::fs::write(paths.settings_file(), "speed: 42\n").expect("overwrite config");

    let err = run_cli_at(&paths, args(&["status"])).expect_err("invalid speed");
    assert!(err.contains("speed"));
}

#[test]
fn app_chat_session_routes_commands_and_engine_controls() {
    let mut core = HumanCore::with_slot(
        Box::new(MemorySlot::new()),
        quiet_settings(),
        Some(Box::new(ScriptedDice::always(0.5))),
    );
    let mut input = Cursor::new(
        "workflow Quarterly Close\n\nspeed 4\nstatus\nbehörde\npause\nupload\nauslastung\nnonsense\n/exit\nworkflow never\n",
    );
    let mut output = Vec::new();

    let summary = run_supervisor_session(&mut core, &mut input, &mut output).expect("session");
    let transcript = String::from_utf8(output).expect("utf8");

    assert!(summary.starts_with("chat ended\ncommands=5"));
    assert!(transcript.contains("supervisor> HumanCore Supervisor online."));
    assert!(transcript
        .contains("supervisor[success]> Workflow \"quarterly close\" initiated (Yellow Zone)."));
    assert!(transcript.contains("engine> speed=4 interval_ms=2500"));
    assert!(transcript.contains("engine> running=true speed=4"));
    assert!(transcript.contains("supervisor[alert]> ALERT: Critical keyword detected."));
    assert!(transcript.contains("engine> paused"));
    assert!(transcript.contains("you> Uploaded: confidential_doc.pdf"));
    assert!(transcript.contains("Current System Load: "));
    assert!(transcript.contains("supervisor> Command not recognized."));
    assert!(!core.engine().is_running());

    let store = store::lock(core.store());
    let names: Vec<&str> = store
        .state()
        .workflows
        .iter()
        .map(|workflow| workflow.name.as_str())
        .collect();
    assert!(names.contains(&"quarterly close"));
    assert!(names.contains(&"Audit-Protocol"));
    assert!(names.contains(&"Doc-Analysis"));
    assert!(!names.contains(&"never"));
}
