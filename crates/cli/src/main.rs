//! Headless front end for arena battles.
//!
//! Run with: `bugz-arena <command>`

mod commands;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Inspect, Live, Run};

/// Trait-driven bug battles from the command line
#[derive(Parser)]
#[command(name = "bugz-arena")]
#[command(about = "Run and watch trait-driven bug battles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Fight a battle to the end without pacing and print the outcome
    Run(Run),

    /// Host a battle on the runtime and watch it tick in real time
    Live(Live),

    /// Show derived stats and targeting tier for every bug in a roster
    Inspect(Inspect),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for ARENA_* and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Live(cmd) => cmd.execute().await,
        Command::Inspect(cmd) => cmd.execute(),
    }
}
