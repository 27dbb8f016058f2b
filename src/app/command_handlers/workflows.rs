use crate::app::command_support::{flag_value, format_workflow_line, open_core};
use crate::config::StatePaths;
use crate::domain::{WorkflowOrigin, WorkflowType, Zone};
use crate::store::{self, NewWorkflow};

const FLAGS_WITH_VALUES: [&str; 2] = ["--zone", "--type"];

pub fn cmd_workflows(paths: &StatePaths) -> Result<String, String> {
    let core = open_core(paths)?;
    let store = store::lock(core.store());
    let workflows = &store.state().workflows;
    if workflows.is_empty() {
        return Ok("no workflows".to_string());
    }
    Ok(workflows
        .iter()
        .map(format_workflow_line)
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn cmd_workflow(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    if args.first().map(String::as_str) != Some("add") {
        return Err("usage: workflow add <name> [--zone green|yellow|red] [--type generic|document]".to_string());
    }
    let rest = &args[1..];
    let zone = flag_value(rest, "--zone")?
        .map(Zone::parse)
        .transpose()?
        .unwrap_or(Zone::Green);
    let kind = flag_value(rest, "--type")?
        .map(WorkflowType::parse)
        .transpose()?
        .unwrap_or(WorkflowType::Generic);
    let name = positional_words(rest).join(" ");
    if name.trim().is_empty() {
        return Err("workflow name must be non-empty".to_string());
    }

    let core = open_core(paths)?;
    let id = store::lock(core.store()).add_workflow(NewWorkflow::new(
        name.trim(),
        kind,
        zone,
        WorkflowOrigin::SupervisorChat,
    ));
    Ok(format!(
        "workflow created\nid={id}\nname={}\nzone={zone}\ntype={kind}",
        name.trim()
    ))
}

fn positional_words(args: &[String]) -> Vec<&str> {
    let mut words = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if FLAGS_WITH_VALUES.contains(&arg.as_str()) {
            skip_next = true;
            continue;
        }
        words.push(arg.as_str());
    }
    words
}
