//! Development tasks for the squad tactics workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod utils;

use anyhow::Result;
use clap::Parser;
use commands::{CheckConfig, Simulate};

/// Development tasks for the squad tactics workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for squad tactics", long_about = None)]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "runtime=debug")
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a scenario headlessly and print a summary
    Simulate(Simulate),

    /// Validate a tactics configuration file
    CheckConfig(CheckConfig),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for TACTICS_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    setup_logging(cli.log.as_deref())?;

    match cli.command {
        Command::Simulate(cmd) => cmd.execute(),
        Command::CheckConfig(cmd) => cmd.execute(),
    }
}

/// Setup logging to stderr
fn setup_logging(fallback: Option<&str>) -> Result<()> {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => tracing_subscriber::EnvFilter::try_new(filter)?,
        Err(_) => tracing_subscriber::EnvFilter::try_new(fallback.unwrap_or("warn"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
