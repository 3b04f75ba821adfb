//! Roster inspection.
//!
//! Resolves each bug's traits and prints what the engine derives from them,
//! without fighting.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use arena_content::{DEFAULT_BUDGET, RosterLoader, TraitBudget};
use arena_core::{DerivedStats, TargetingTier};

/// Show derived stats for every bug in a roster
#[derive(Parser)]
pub struct Inspect {
    /// Roster file (.ron or .json)
    #[arg(short, long, value_name = "FILE")]
    roster: PathBuf,

    /// Trait budget to compare against
    #[arg(long, value_name = "POINTS", default_value_t = DEFAULT_BUDGET)]
    budget: u32,
}

impl Inspect {
    pub fn execute(self) -> Result<()> {
        let specs = RosterLoader::load(&self.roster)?;
        let budget = TraitBudget::new(self.budget);

        for spec in &specs {
            let traits = spec
                .traits
                .resolve()
                .with_context(|| format!("{} ({}) has invalid traits", spec.name, spec.id))?;
            let stats = DerivedStats::from_traits(&traits);
            let tier = TargetingTier::for_intelligence(stats.actual_intelligence);

            let spent = TraitBudget::spent(spec);
            let points = if budget.allows(spec) {
                style(format!("{spent}/{}", self.budget)).green()
            } else {
                style(format!("{spent}/{} over budget", self.budget)).red()
            };

            println!("{} {}", style(&spec.name).bold(), style(spec.id).dim());
            println!(
                "  traits     spd {:>3}  str {:>3}  def {:>3}  int {:>3}  ({points})",
                traits.speed(),
                traits.strength(),
                traits.defense(),
                traits.intelligence()
            );
            println!(
                "  movement   {:.2}/tick     damage {:.1}     absorbs {:.0}%",
                stats.actual_speed,
                stats.actual_strength,
                stats.actual_defense * 100.0
            );
            println!(
                "  chances    crit {:.0}%  dodge {:.0}%  block {:.0}%",
                stats.critical_chance * 100.0,
                stats.dodge_chance * 100.0,
                stats.block_chance * 100.0
            );
            println!("  targeting  {tier}");
        }

        Ok(())
    }
}
