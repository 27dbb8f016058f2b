#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Init,
    Run,
    Status,
    Workflows,
    Logs,
    Workflow,
    Configure,
    Reset,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "init" => CliVerb::Init,
        "run" => CliVerb::Run,
        "status" => CliVerb::Status,
        "workflows" => CliVerb::Workflows,
        "logs" => CliVerb::Logs,
        "workflow" => CliVerb::Workflow,
        "configure" => CliVerb::Configure,
        "reset" => CliVerb::Reset,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  init                                 Create the state root and a default config.yaml"
            .to_string(),
        "  run                                  Start the engine and open the supervisor chat"
            .to_string(),
        "  status                               Show tick counter, profile and worker roster"
            .to_string(),
        "  workflows                            List workflows, newest first".to_string(),
        "  logs [--limit <n>]                   Print the audit log, newest first".to_string(),
        "  workflow add <name> [--zone <z>] [--type <t>]".to_string(),
        "                                       Create a planned workflow".to_string(),
        "  configure <profile> <autonomy 1-5> <confirm true|false>".to_string(),
        "                                       Apply a system profile".to_string(),
        "  reset                                Clear logs and workflows, idle every worker"
            .to_string(),
        "  help                                 Show this help".to_string(),
    ]
}

pub fn chat_help_lines() -> Vec<String> {
    vec![
        "Chat controls:".to_string(),
        "  speed <1-10>                         Change the tick speed multiplier".to_string(),
        "  pause | resume                       Stop or restart the engine".to_string(),
        "  status                               Show engine and worker status".to_string(),
        "  /exit | exit | quit                  Leave the chat (stops the engine)".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    let mut lines = cli_help_lines();
    lines.push(String::new());
    lines.extend(chat_help_lines());
    lines.join("\n")
}
