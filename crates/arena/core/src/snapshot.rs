//! Read-only battle views handed to spectators.

use crate::event::BattleEvent;
use crate::state::{
    BattleId, BattleStatus, CombatTally, Combatant, CombatantId, LastAction, Vec2,
};
use crate::stats::TraitSet;

/// One combatant as seen from outside the session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub name: String,
    pub color: String,
    pub traits: TraitSet,
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: f64,
    pub health: f64,
    pub max_health: f64,
    pub stamina: f64,
    pub max_stamina: f64,
    pub attack_cooldown: u32,
    pub stunned: u32,
    pub last_action: LastAction,
    pub alive: bool,
    pub tally: CombatTally,
}

impl From<&Combatant> for CombatantSnapshot {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            name: combatant.name.clone(),
            color: combatant.color.clone(),
            traits: *combatant.traits(),
            position: combatant.position,
            velocity: combatant.velocity,
            facing: combatant.facing,
            health: combatant.health,
            max_health: combatant.max_health,
            stamina: combatant.stamina,
            max_stamina: combatant.max_stamina,
            attack_cooldown: combatant.attack_cooldown,
            stunned: combatant.stunned,
            last_action: combatant.last_action,
            alive: combatant.is_alive(),
            tally: combatant.tally,
        }
    }
}

/// Immutable view of a battle after a tick (or after start / terminate).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub session_id: BattleId,
    pub status: BattleStatus,
    pub elapsed_ticks: u64,
    /// In roster order, defeated combatants included.
    pub combatants: Vec<CombatantSnapshot>,
    /// Events emitted by the operation that produced this snapshot.
    pub events: Vec<BattleEvent>,
    pub winner: Option<CombatantId>,
}

impl BattleSnapshot {
    pub fn combatant(&self, id: CombatantId) -> Option<&CombatantSnapshot> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn alive_count(&self) -> usize {
        self.combatants.iter().filter(|c| c.alive).count()
    }

    pub fn is_finished(&self) -> bool {
        self.status == BattleStatus::Finished
    }

    /// Battle-log lines for this snapshot's events.
    pub fn log_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .map(|event| {
                event.log_line(|id| self.combatant(id).map(|c| c.name.as_str()))
            })
            .collect()
    }

    /// SHA-256 over the bincode encoding of the snapshot.
    ///
    /// Two runs with the same seed and roster produce the same digest sequence.
    /// Returns `None` if the snapshot cannot be encoded.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Option<[u8; 32]> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self).ok()?;
        Some(Sha256::digest(&bytes).into())
    }
}
