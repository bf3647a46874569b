//! Tournament CLI
//!
//! Manage the club roster and run Swiss tournaments round by round.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tournament::{App, Cli, Config};

fn init_logging(config: &Config, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("Failed to read configuration {}", cli.config.display()))?;
    init_logging(&config, cli.debug);

    let mut app = App::open(config)?;
    let output = app.run(cli.command)?;
    println!("{}", output.trim_end());
    Ok(())
}
