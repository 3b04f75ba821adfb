//! Headless battle run.
//!
//! Fights one battle to completion as fast as possible, then prints the
//! battle log, the report and the digest of the final snapshot.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use arena_content::{ConfigLoader, RosterLoader};
use arena_core::{ArenaConfig, BattleId, BattleSession, SessionRng};

use crate::render;

/// Fight a battle to the end
#[derive(Parser)]
pub struct Run {
    /// Roster file (.ron or .json)
    #[arg(short, long, value_name = "FILE")]
    roster: PathBuf,

    /// Seed for the battle's random stream (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Arena rules (TOML). Defaults to the built-in rules
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Skip the per-tick battle log
    #[arg(short, long)]
    quiet: bool,

    /// Reject bugs that spend more trait points than this (e.g. 300)
    #[arg(long, value_name = "POINTS")]
    budget: Option<u32>,

    /// Stalemate after this many ticks unless the config file sets its own
    /// limit. 0 removes the cap
    #[arg(long, value_name = "TICKS", default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: u64,
}

/// Cap for headless runs, far past the length of any decisive battle.
const DEFAULT_MAX_TICKS: u64 = 100_000;

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Battle log and report table
    Text,
    /// One JSON document with log, report and digest
    Json,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let specs = RosterLoader::load(&self.roster)?;
        if let Some(budget) = self.budget {
            RosterLoader::check_budget(&specs, budget)?;
        }

        let config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => ArenaConfig::default(),
        };
        let config = cap_ticks(config, self.max_ticks);

        let rng = self
            .seed
            .map(SessionRng::seeded)
            .unwrap_or_else(SessionRng::from_entropy);
        let seed = rng.seed();
        info!(seed, roster = %self.roster.display(), "starting battle");

        let mut session = BattleSession::create(BattleId(1), specs, config, rng)
            .context("Failed to start battle")?;

        let mut log = Vec::new();
        let mut snapshot = session.snapshot();
        loop {
            log.extend(snapshot.log_lines());
            if snapshot.is_finished() {
                break;
            }
            snapshot = session
                .advance_tick()
                .with_context(|| format!("Battle aborted (seed {seed})"))?;
        }

        let report = session
            .report()
            .context("Battle ended without a report")?;
        let digest = snapshot
            .digest()
            .map(hex::encode)
            .context("Failed to encode the final snapshot")?;

        match self.format {
            OutputFormat::Text => {
                if !self.quiet {
                    for line in &log {
                        println!("{line}");
                    }
                    println!();
                }
                render::print_report(&report);
                println!("seed:   {seed}");
                println!("digest: {digest}");
            }
            OutputFormat::Json => {
                let log = if self.quiet { Vec::new() } else { log };
                let document = serde_json::json!({
                    "seed": seed,
                    "digest": digest,
                    "report": report,
                    "log": log,
                });
                let json = serde_json::to_string_pretty(&document)
                    .context("Failed to serialize battle output")?;
                println!("{json}");
            }
        }

        Ok(())
    }
}

/// Fills in a tick limit when the rules leave it open.
fn cap_ticks(mut config: ArenaConfig, max_ticks: u64) -> ArenaConfig {
    if config.tick_limit.is_none() && max_ticks > 0 {
        config.tick_limit = Some(max_ticks);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_applies_only_to_open_rules() {
        let open = cap_ticks(ArenaConfig::default(), 500);
        assert_eq!(open.tick_limit, Some(500));

        let limited = ArenaConfig {
            tick_limit: Some(42),
            ..ArenaConfig::default()
        };
        assert_eq!(cap_ticks(limited, 500).tick_limit, Some(42));

        assert_eq!(cap_ticks(ArenaConfig::default(), 0).tick_limit, None);
    }
}
