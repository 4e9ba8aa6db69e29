//! Development tasks for the obituary workspace
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{CheckCatalog, Replay};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Development tasks for the obituary workspace
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for obituary", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Validate a message catalog and print its statistics
    CheckCatalog(CheckCatalog),

    /// Replay a scripted damage/death scenario and print each outcome
    Replay(Replay),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for RUST_LOG and other env vars)
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    // Logs go to stderr so command output on stdout stays clean
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::CheckCatalog(cmd) => cmd.execute(),
        Command::Replay(cmd) => cmd.execute(),
    }
}
