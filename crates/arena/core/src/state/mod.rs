//! Battle state representation.
//!
//! This module owns the data structures that describe combatants and the
//! battle roster. Sessions clone or query this state but mutate it only
//! through the engine.
pub mod battle;
pub mod combatant;
pub mod types;

pub use battle::{BattleState, Roster};
pub use combatant::{CombatTally, Combatant, CombatantSpec};
pub use types::{BattleId, BattleStatus, CombatantId, LastAction, Vec2};
