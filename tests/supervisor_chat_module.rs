use humancore::app::HumanCore;
use humancore::config::Settings;
use humancore::domain::{LogLevel, WorkerStatus, WorkflowOrigin, WorkflowType, Zone};
use humancore::store;
use humancore::supervisor::{
    execute, parse_command, ReplyKind, SupervisorCommand, HELP_TEXT, UNRECOGNIZED_TEXT,
};

fn core() -> HumanCore {
    HumanCore::in_memory(Settings::default())
}

fn say(core: &HumanCore, text: &str) -> humancore::supervisor::Reply {
    execute(&parse_command(text), core.engine())
}

#[test]
fn supervisor_workflow_command_creates_yellow_generic_workflow() {
    let core = core();
    let reply = say(&core, "workflow Vendor Onboarding");

    assert_eq!(reply.kind, ReplyKind::Success);
    assert_eq!(
        reply.text,
        "Workflow \"vendor onboarding\" initiated (Yellow Zone)."
    );
    let store = store::lock(core.store());
    let workflow = &store.state().workflows[0];
    assert_eq!(workflow.name, "vendor onboarding");
    assert_eq!(workflow.kind, WorkflowType::Generic);
    assert_eq!(workflow.zone, Zone::Yellow);
    assert_eq!(workflow.origin, WorkflowOrigin::SupervisorChat);

    let logs = &store.state().logs;
    assert_eq!(logs[0].source, "SV");
    assert_eq!(logs[0].level, LogLevel::Success);
    assert_eq!(logs[0].message, "Supervisor created workflow: vendor onboarding");
    assert_eq!(logs[1].message, "New Workflow created: vendor onboarding");
}

#[test]
fn supervisor_bare_workflow_gets_generated_name_and_bericht_keeps_its_own() {
    let core = core();
    for text in ["workflow", "Bericht"] {
        let reply = say(&core, text);
        assert_eq!(reply.kind, ReplyKind::Success);
    }
    let store = store::lock(core.store());
    let workflows = &store.state().workflows;
    assert_eq!(workflows.len(), 2);
    assert_eq!(workflows[0].name, "bericht");

    let suffix = workflows[1]
        .name
        .strip_prefix("Auto-Task-")
        .expect("generated name");
    let number: u32 = suffix.parse().expect("numeric suffix");
    assert!(number < 1000);
}

#[test]
fn supervisor_critical_keyword_opens_red_zone_audit() {
    let core = core();
    let reply = say(&core, "Post von der Behörde");

    assert_eq!(reply.kind, ReplyKind::Alert);
    assert_eq!(
        reply.text,
        "ALERT: Critical keyword detected. Red Zone protocol initiated."
    );
    let store = store::lock(core.store());
    let workflow = &store.state().workflows[0];
    assert_eq!(workflow.name, "Audit-Protocol");
    assert_eq!(workflow.kind, WorkflowType::Document);
    assert_eq!(workflow.zone, Zone::Red);

    let logs = &store.state().logs;
    assert_eq!(logs[1].level, LogLevel::Error);
    assert_eq!(logs[1].message, "CRITICAL KEYWORD DETECTED");
}

#[test]
fn supervisor_upload_starts_green_document_analysis() {
    let core = core();
    let reply = execute(
        &SupervisorCommand::Upload {
            file: "invoice.pdf".to_string(),
        },
        core.engine(),
    );

    assert_eq!(reply.kind, ReplyKind::Success);
    assert_eq!(reply.text, "Document received. Workflow started (Green Zone).");
    let store = store::lock(core.store());
    let workflow = &store.state().workflows[0];
    assert_eq!(workflow.name, "Doc-Analysis");
    assert_eq!(workflow.zone, Zone::Green);
    assert_eq!(workflow.meta["file"], "invoice.pdf");
    assert_eq!(store.state().logs[0].message, "Document received via chat");
}

#[test]
fn supervisor_load_reply_stays_in_simulated_range() {
    let core = core();
    for _ in 0..50 {
        let reply = say(&core, "auslastung");
        assert_eq!(reply.kind, ReplyKind::Text);
        let percent: u32 = reply
            .text
            .strip_prefix("Current System Load: ")
            .and_then(|rest| rest.strip_suffix("% (Simulated)"))
            .expect("load format")
            .parse()
            .expect("number");
        assert!((40..80).contains(&percent), "load {percent} out of range");
    }
    assert!(store::lock(core.store()).state().logs.is_empty());
}

#[test]
fn supervisor_reset_wipes_simulation_then_logs_request() {
    let core = core();
    say(&core, "workflow cleanup");
    core.engine().tick().expect("tick");

    let reply = say(&core, "reset");

    assert_eq!(reply.kind, ReplyKind::Text);
    assert_eq!(reply.text, "System reset initiated.");
    let store = store::lock(core.store());
    assert!(store.state().workflows.is_empty());
    assert_eq!(store.state().logs.len(), 1);
    assert_eq!(store.state().logs[0].level, LogLevel::Warning);
    assert_eq!(store.state().logs[0].message, "User requested full reset");
    assert!(store
        .state()
        .workers
        .iter()
        .all(|worker| worker.status == WorkerStatus::Idle && worker.stats.tasks_completed == 0));
}

#[test]
fn supervisor_help_and_unknown_input_are_plain_replies() {
    let core = core();
    let help = say(&core, "help");
    assert_eq!(help.kind, ReplyKind::Text);
    assert_eq!(help.text, HELP_TEXT);

    let unknown = say(&core, "make me a sandwich");
    assert_eq!(unknown.kind, ReplyKind::Text);
    assert_eq!(unknown.text, UNRECOGNIZED_TEXT);
    assert!(store::lock(core.store()).state().workflows.is_empty());
}
