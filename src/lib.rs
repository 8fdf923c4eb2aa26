pub mod cli;
pub mod config;
pub mod persona;
pub mod prompt;

use anyhow::Result;
use cli::{CliArgs, run_command};
use config::AppConfig;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PERSONAKIT_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

pub fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load_with_path(args.config.as_deref())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_command(&args, &config, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_logging() {
    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(DEFAULT_LOG_FILTER),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
