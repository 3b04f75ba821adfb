use serde::{Deserialize, Serialize};

use arena_core::{BattleId, BattleReport, CombatantId, EndReason};

/// Battle lifecycle notices, published on [`Topic::Lifecycle`](super::Topic).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    BattleStarted {
        battle: BattleId,
        seed: u64,
        combatants: usize,
    },
    BattleFinished {
        battle: BattleId,
        winner: Option<CombatantId>,
        reason: EndReason,
        ticks: u64,
        report: Box<BattleReport>,
    },
    /// The worker has exited; the battle is no longer queryable.
    BattleRetired { battle: BattleId },
}

impl LifecycleEvent {
    pub fn battle(&self) -> BattleId {
        match self {
            Self::BattleStarted { battle, .. }
            | Self::BattleFinished { battle, .. }
            | Self::BattleRetired { battle } => *battle,
        }
    }
}
