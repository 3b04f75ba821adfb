//! Roster loader.
//!
//! A roster is a list of [`CombatantSpec`]s. RON files should start with
//! `#![enable(implicit_some)]` so traits can be written as plain numbers.

use std::path::Path;

use arena_core::CombatantSpec;

use crate::budget::TraitBudget;
use crate::loaders::{LoadResult, read_file};

/// Loader for combatant rosters from RON or JSON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster, choosing the format from the file extension
    /// (`.ron` or `.json`).
    ///
    /// Only the file format is checked here. Trait ranges, ids and spawn
    /// points are validated when the battle starts.
    pub fn load(path: &Path) -> LoadResult<Vec<CombatantSpec>> {
        let content = read_file(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let specs = match extension.as_deref() {
            Some("ron") => Self::parse_ron(&content)?,
            Some("json") => Self::parse_json(&content)?,
            _ => anyhow::bail!(
                "Unsupported roster format for {} (expected .ron or .json)",
                path.display()
            ),
        };

        if specs.is_empty() {
            anyhow::bail!("Roster {} contains no combatants", path.display());
        }
        Ok(specs)
    }

    pub fn parse_ron(content: &str) -> LoadResult<Vec<CombatantSpec>> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))
    }

    pub fn parse_json(content: &str) -> LoadResult<Vec<CombatantSpec>> {
        serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster JSON: {}", e))
    }

    /// Rejects the roster if any bug spends more than `budget` trait points.
    pub fn check_budget(specs: &[CombatantSpec], budget: u32) -> LoadResult<()> {
        let budget = TraitBudget::new(budget);
        for spec in specs {
            if !budget.allows(spec) {
                anyhow::bail!(
                    "{} spends {} trait points, over the budget of {}",
                    spec.name,
                    TraitBudget::spent(spec),
                    budget.limit
                );
            }
        }
        Ok(())
    }
}
