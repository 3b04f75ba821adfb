//! Real-time battle hosted on the runtime.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use arena_content::RosterLoader;
use arena_runtime::{Event, RuntimeConfig, SessionRegistry, Topic};

use crate::render;

/// Watch a battle tick in real time. Ctrl-C terminates it.
#[derive(Parser)]
pub struct Live {
    /// Roster file (.ron or .json)
    #[arg(short, long, value_name = "FILE")]
    roster: PathBuf,

    /// Seed for the battle's random stream (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Milliseconds between ticks (overrides ARENA_TICK_MS)
    #[arg(short, long, value_name = "MS")]
    tick_ms: Option<u64>,
}

impl Live {
    pub async fn execute(self) -> Result<()> {
        let specs = RosterLoader::load(&self.roster)?;

        let mut config = RuntimeConfig::from_env();
        if let Some(ms) = self.tick_ms {
            config.tick_interval = Some(Duration::from_millis(ms.max(1)));
        }
        if config.tick_interval.is_none() {
            anyhow::bail!("Live mode needs a tick interval: pass --tick-ms with a non-zero value");
        }

        let registry = SessionRegistry::new(config);
        let handle = registry
            .start_battle(specs, self.seed)
            .await
            .context("Failed to start battle")?;
        let mut snapshots = handle.subscribe(Topic::Snapshot);

        println!(
            "{} {} (seed {})",
            style("Live").bold().cyan(),
            handle.id(),
            handle.seed()
        );

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                received = snapshots.recv() => match received {
                    Ok(Event::Snapshot(snapshot)) => {
                        render::print_tick(&snapshot);
                        if snapshot.is_finished() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "live view fell behind, skipping ticks");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = &mut ctrl_c => {
                    println!("{}", style("Interrupted").yellow());
                    registry
                        .terminate(handle.id())
                        .await
                        .context("Failed to terminate battle")?;
                    break;
                }
            }
        }

        if let Some(report) = handle.report().await? {
            println!();
            render::print_report(&report);
        }

        registry.shutdown().await?;
        Ok(())
    }
}
