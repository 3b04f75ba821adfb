//! Post-battle summary.

use crate::engine::EndReason;
use crate::state::{BattleId, BattleState, CombatTally, CombatantId};

/// Per-combatant line of a [`BattleReport`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportEntry {
    pub id: CombatantId,
    pub name: String,
    pub survived: bool,
    pub health_left: f64,
    pub tally: CombatTally,
}

/// Outcome of a finished battle, for win/loss bookkeeping.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleReport {
    pub battle_id: BattleId,
    pub winner: Option<CombatantId>,
    pub reason: EndReason,
    pub ticks: u64,
    pub entries: Vec<ReportEntry>,
}

impl BattleReport {
    pub fn new(
        battle_id: BattleId,
        state: &BattleState,
        winner: Option<CombatantId>,
        reason: EndReason,
    ) -> Self {
        let entries = state
            .combatants
            .iter()
            .map(|c| ReportEntry {
                id: c.id,
                name: c.name.clone(),
                survived: c.is_alive(),
                health_left: c.health,
                tally: c.tally,
            })
            .collect();

        Self {
            battle_id,
            winner,
            reason,
            ticks: state.tick,
            entries,
        }
    }

    /// Combatants credited with a win. Empty on a draw or stalemate.
    pub fn winners(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| Some(e.id) == self.winner)
    }

    /// Combatants credited with a loss: everyone but the winner, provided
    /// the battle was decided.
    pub fn losers(&self) -> impl Iterator<Item = &ReportEntry> {
        let decided = self.winner.is_some();
        self.entries
            .iter()
            .filter(move |e| decided && Some(e.id) != self.winner)
    }
}
