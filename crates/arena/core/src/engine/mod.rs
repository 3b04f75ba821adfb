//! Step engine.
//!
//! [`advance`] is the only way a battle state moves forward. It is pure: the
//! input state is borrowed, randomness comes from the caller, and the result
//! is a new state plus the events that explain how it got there.
pub mod effects;
pub mod invariants;
pub mod step;
pub mod tick;

pub use invariants::{InvariantViolation, Quantity, check_state};
pub use step::{Strike, step_combatant};
pub use tick::{TickOutcome, advance, conclude};

use crate::state::CombatantId;

/// Why a battle finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    /// At most one combatant is still alive.
    LastStanding,
    /// A collaborator stopped the battle.
    Terminated,
    /// The configured tick limit was reached with several survivors.
    TickLimit,
    /// Nobody left standing can move or reach an opponent, so nothing can
    /// change any more.
    Deadlock,
    /// An engine invariant broke and the battle was aborted.
    Fault,
}

/// How a finished battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conclusion {
    pub winner: Option<CombatantId>,
    pub reason: EndReason,
}

impl Conclusion {
    pub const fn without_winner(reason: EndReason) -> Self {
        Self {
            winner: None,
            reason,
        }
    }
}
