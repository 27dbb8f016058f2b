use crate::app::cli::chat_help_lines;
use crate::app::command_support::{open_core, status_lines, write_line};
use crate::app::human_core::HumanCore;
use crate::config::{Settings, StatePaths};
use crate::store;
use crate::supervisor::{self, Reply, ReplyKind, SupervisorCommand, GREETING};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

const CHAT_EXIT_COMMANDS: &[&str] = &["/exit", "exit", "quit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatDelays {
    pub thinking: Duration,
    pub upload: Duration,
}

impl From<&Settings> for ChatDelays {
    fn from(settings: &Settings) -> Self {
        Self {
            thinking: settings.thinking_delay(),
            upload: settings.upload_delay(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatInput<'a> {
    Exit,
    Speed(Result<u32, String>),
    Pause,
    Resume,
    Status,
    Controls,
    Supervisor(&'a str),
}

fn classify(message: &str) -> ChatInput<'_> {
    let lower = message.to_ascii_lowercase();
    if CHAT_EXIT_COMMANDS.iter().any(|cmd| lower == *cmd) {
        return ChatInput::Exit;
    }
    match lower.split_whitespace().collect::<Vec<_>>().as_slice() {
        ["speed", value] => ChatInput::Speed(
            value
                .parse::<u32>()
                .map_err(|_| format!("invalid speed `{value}`; usage: speed <1-10>")),
        ),
        ["speed", ..] => ChatInput::Speed(Err("usage: speed <1-10>".to_string())),
        ["pause"] => ChatInput::Pause,
        ["resume"] => ChatInput::Resume,
        ["status"] => ChatInput::Status,
        ["controls"] => ChatInput::Controls,
        _ => ChatInput::Supervisor(message),
    }
}

pub fn cmd_run(paths: &StatePaths) -> Result<String, String> {
    let mut core = open_core(paths)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();
    run_supervisor_session(&mut core, &mut input, &mut output)
}

/// Starts the engine, serves the chat until EOF or an exit command, then stops the engine.
pub fn run_supervisor_session<R: BufRead, W: Write>(
    core: &mut HumanCore,
    input: &mut R,
    output: &mut W,
) -> Result<String, String> {
    let delays = ChatDelays::from(core.settings());
    core.engine_mut().start().map_err(|e| e.to_string())?;
    let result = run_chat_repl(core, input, output, delays);
    core.engine_mut().stop();

    let ticks = store::lock(core.store()).state().stats.ticks;
    let handled = result?;
    Ok(format!("chat ended\ncommands={handled}\nticks={ticks}"))
}

fn run_chat_repl<R: BufRead, W: Write>(
    core: &mut HumanCore,
    input: &mut R,
    output: &mut W,
    delays: ChatDelays,
) -> Result<usize, String> {
    write_line(output, &format!("supervisor> {GREETING}"))?;
    write_line(output, "type `/exit` to quit, `controls` for engine controls")?;

    let mut handled = 0;
    loop {
        write!(output, "you> ").map_err(|e| format!("failed to write chat prompt: {e}"))?;
        output
            .flush()
            .map_err(|e| format!("failed to flush chat prompt: {e}"))?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .map_err(|e| format!("failed to read chat input: {e}"))?;
        if read == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        match classify(message) {
            ChatInput::Exit => break,
            ChatInput::Speed(Ok(requested)) => {
                let engine = core.engine_mut();
                let applied = engine.set_speed(requested).map_err(|e| e.to_string())?;
                write_line(
                    output,
                    &format!(
                        "engine> speed={applied} interval_ms={}",
                        engine.interval().as_millis()
                    ),
                )?;
            }
            ChatInput::Speed(Err(message)) => write_line(output, &format!("engine> {message}"))?,
            ChatInput::Pause => {
                core.engine_mut().stop();
                write_line(output, "engine> paused")?;
            }
            ChatInput::Resume => {
                core.engine_mut().start().map_err(|e| e.to_string())?;
                write_line(output, "engine> running")?;
            }
            ChatInput::Status => {
                let engine = core.engine();
                write_line(
                    output,
                    &format!(
                        "engine> running={} speed={} interval_ms={}",
                        engine.is_running(),
                        engine.speed(),
                        engine.interval().as_millis()
                    ),
                )?;
                let lines = status_lines(store::lock(core.store()).state());
                for line in lines {
                    write_line(output, &format!("engine> {line}"))?;
                }
            }
            ChatInput::Controls => {
                for line in chat_help_lines() {
                    write_line(output, &line)?;
                }
            }
            ChatInput::Supervisor(text) => {
                let command = supervisor::parse_command(text);
                // Only the chat path waits; the ticker thread keeps running.
                let delay = match &command {
                    SupervisorCommand::Upload { file } => {
                        write_line(output, &format!("you> Uploaded: {file}"))?;
                        delays.upload
                    }
                    _ => delays.thinking,
                };
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                let reply = supervisor::execute(&command, core.engine());
                write_line(output, &format_reply(&reply))?;
                handled += 1;
            }
        }
    }
    Ok(handled)
}

fn format_reply(reply: &Reply) -> String {
    match reply.kind {
        ReplyKind::Text => format!("supervisor> {}", reply.text),
        kind => format!("supervisor[{}]> {}", kind.as_str(), reply.text),
    }
}
