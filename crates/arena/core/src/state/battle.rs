//! The authoritative state of one battle.

use arrayvec::ArrayVec;

use crate::config::ArenaConfig;

use super::combatant::Combatant;
use super::types::CombatantId;

/// Fixed-capacity roster storage.
pub type Roster = ArrayVec<Combatant, { ArenaConfig::MAX_COMBATANTS }>;

/// Canonical battle state: the roster and the tick counter.
///
/// Roster order is stable for the whole battle and is the iteration order used
/// for tie-breaking and random draws.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// Ticks elapsed since the battle started.
    pub tick: u64,
    pub combatants: Roster,
}

impl BattleState {
    pub fn new(combatants: Roster) -> Self {
        Self {
            tick: 0,
            combatants,
        }
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    pub fn alive_count(&self) -> usize {
        self.living().count()
    }

    /// The only combatant still standing, if exactly one is.
    pub fn sole_survivor(&self) -> Option<&Combatant> {
        let mut living = self.living();
        match (living.next(), living.next()) {
            (Some(survivor), None) => Some(survivor),
            _ => None,
        }
    }
}
