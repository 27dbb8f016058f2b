//! Supervisor chat: maps free-text operator input onto store mutations and a reply.

use crate::domain::{LogLevel, WorkflowOrigin, WorkflowType, Zone};
use crate::engine::Engine;
use crate::shared::random::random_below;
use crate::store::{self, NewWorkflow};

pub const SOURCE: &str = "SV";
pub const GREETING: &str =
    "HumanCore Supervisor online. Waiting for commands. (Try \"help\", \"workflow\", \"behörde\")";
pub const HELP_TEXT: &str = "Commands available: \"workflow [name]\", \"bericht\", \"behörde\" (alert), \"reset\" (clear chat/logs), \"auslastung\", \"upload [file]\" (simulated document drop).";
pub const UNRECOGNIZED_TEXT: &str =
    "Command not recognized. I am a demo agent, my capabilities are limited.";
pub const DEFAULT_UPLOAD_FILE: &str = "confidential_doc.pdf";

const CRITICAL_KEYWORDS: [&str; 2] = ["behörde", "finanz"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorCommand {
    Help,
    Reset,
    /// `None` asks for a generated `Auto-Task-<n>` name.
    CreateWorkflow { name: Option<String> },
    CriticalKeyword,
    Load,
    Upload { file: String },
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Text,
    Alert,
    Success,
}

impl ReplyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Alert => "alert",
            Self::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

impl Reply {
    fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

pub fn parse_command(text: &str) -> SupervisorCommand {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();

    if lower == "help" {
        return SupervisorCommand::Help;
    }
    if lower == "reset" {
        return SupervisorCommand::Reset;
    }
    if lower == "workflow" || lower.starts_with("workflow ") || lower == "bericht" {
        let name = lower.replacen("workflow", "", 1).trim().to_string();
        return SupervisorCommand::CreateWorkflow {
            name: (!name.is_empty()).then_some(name),
        };
    }
    if lower == "upload" || lower.starts_with("upload ") {
        // File names keep their case.
        let file = trimmed.get("upload".len()..).unwrap_or_default().trim();
        return SupervisorCommand::Upload {
            file: if file.is_empty() {
                DEFAULT_UPLOAD_FILE.to_string()
            } else {
                file.to_string()
            },
        };
    }
    if CRITICAL_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
    {
        return SupervisorCommand::CriticalKeyword;
    }
    if lower == "auslastung" {
        return SupervisorCommand::Load;
    }
    SupervisorCommand::Unrecognized
}

pub fn execute(command: &SupervisorCommand, engine: &Engine) -> Reply {
    match command {
        SupervisorCommand::Help => Reply::new(ReplyKind::Text, HELP_TEXT),
        SupervisorCommand::Reset => {
            store::lock(engine.store()).reset_simulation();
            engine.sync_workers();
            store::lock(engine.store()).add_log(
                SOURCE,
                LogLevel::Warning,
                "User requested full reset",
            );
            Reply::new(ReplyKind::Text, "System reset initiated.")
        }
        SupervisorCommand::CreateWorkflow { name } => {
            let name = name
                .clone()
                .unwrap_or_else(|| format!("Auto-Task-{}", random_below(1000)));
            let mut store = store::lock(engine.store());
            store.add_workflow(NewWorkflow::new(
                name.clone(),
                WorkflowType::Generic,
                Zone::Yellow,
                WorkflowOrigin::SupervisorChat,
            ));
            store.add_log(
                SOURCE,
                LogLevel::Success,
                format!("Supervisor created workflow: {name}"),
            );
            Reply::new(
                ReplyKind::Success,
                format!("Workflow \"{name}\" initiated (Yellow Zone)."),
            )
        }
        SupervisorCommand::CriticalKeyword => {
            let mut store = store::lock(engine.store());
            store.add_log(SOURCE, LogLevel::Error, "CRITICAL KEYWORD DETECTED");
            store.add_workflow(NewWorkflow::new(
                "Audit-Protocol",
                WorkflowType::Document,
                Zone::Red,
                WorkflowOrigin::SupervisorChat,
            ));
            Reply::new(
                ReplyKind::Alert,
                "ALERT: Critical keyword detected. Red Zone protocol initiated.",
            )
        }
        SupervisorCommand::Load => Reply::new(
            ReplyKind::Text,
            format!("Current System Load: {}% (Simulated)", 40 + random_below(40)),
        ),
        SupervisorCommand::Upload { file } => {
            let mut store = store::lock(engine.store());
            store.add_workflow(
                NewWorkflow::new(
                    "Doc-Analysis",
                    WorkflowType::Document,
                    Zone::Green,
                    WorkflowOrigin::SupervisorChat,
                )
                .with_meta("file", file.clone()),
            );
            store.add_log(SOURCE, LogLevel::Info, "Document received via chat");
            Reply::new(
                ReplyKind::Success,
                "Document received. Workflow started (Green Zone).",
            )
        }
        SupervisorCommand::Unrecognized => Reply::new(ReplyKind::Text, UNRECOGNIZED_TEXT),
    }
}
