use anyhow::Result;
use clap::Parser;
use personakit::cli::CliArgs;

fn main() -> Result<()> {
    personakit::init_logging();
    let args = CliArgs::parse();
    personakit::run(args)
}
