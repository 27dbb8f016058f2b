pub mod cli;
pub mod command_handlers;
pub mod command_support;
pub mod human_core;

pub use command_handlers::{run_cli, run_cli_at};
pub use human_core::HumanCore;
