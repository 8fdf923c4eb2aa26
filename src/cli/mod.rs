mod args;
mod commands;

pub use args::{CliArgs, CliCommand, RequestArgs};
pub use commands::{resolve_persona, run_command};
