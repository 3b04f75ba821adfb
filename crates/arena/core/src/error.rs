//! Shared error infrastructure for arena-core.
//!
//! Every error type in the crate implements [`ArenaError`] so callers can pick
//! a handling strategy from the severity alone.

use crate::config::ArenaConfig;
use crate::engine::InvariantViolation;
use crate::state::{BattleStatus, CombatantId};
use crate::stats::TraitError;

/// Severity level of an error.
///
/// - **Validation**: bad input, reject without retry
/// - **Recoverable**: wrong moment, the same call may succeed later
/// - **Internal**: the engine broke its own invariants; investigate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Validation,
    Recoverable,
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Recoverable => "recoverable",
            Self::Internal => "internal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for arena-core errors.
pub trait ArenaError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Rejected battle setup.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("a battle needs between {min} and {max} combatants, got {count}")]
    CombatantCount {
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("combatant {combatant} has invalid traits")]
    Trait {
        combatant: CombatantId,
        #[source]
        source: TraitError,
    },

    #[error("combatant id {0} appears more than once")]
    DuplicateId(CombatantId),

    #[error("spawn point ({x}, {y}) of combatant {combatant} lies outside the arena")]
    SpawnOutOfBounds { combatant: CombatantId, x: f64, y: f64 },

    #[error("cached stats of combatant {0} do not match its traits")]
    StatsMismatch(CombatantId),
}

impl ValidationError {
    pub(crate) fn combatant_count(count: usize) -> Self {
        Self::CombatantCount {
            count,
            min: ArenaConfig::MIN_COMBATANTS,
            max: ArenaConfig::MAX_COMBATANTS,
        }
    }
}

impl ArenaError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CombatantCount { .. } => "SETUP_COMBATANT_COUNT",
            Self::Trait { .. } => "SETUP_INVALID_TRAIT",
            Self::DuplicateId(_) => "SETUP_DUPLICATE_ID",
            Self::SpawnOutOfBounds { .. } => "SETUP_SPAWN_OUT_OF_BOUNDS",
            Self::StatsMismatch(_) => "SETUP_STATS_MISMATCH",
        }
    }
}

impl ArenaError for InvariantViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "ENGINE_INVARIANT_VIOLATION"
    }
}

/// Operations on a [`BattleSession`](crate::session::BattleSession), named in
/// state-transition errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SessionOp {
    Enlist,
    Start,
    AdvanceTick,
    Terminate,
}

/// Errors returned by session operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot {operation} a battle that is {status}")]
    InvalidStateTransition {
        status: BattleStatus,
        operation: SessionOp,
    },

    /// The tick was discarded and the battle forced to finish.
    #[error("battle aborted: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}

impl SessionError {
    pub(crate) fn transition(status: BattleStatus, operation: SessionOp) -> Self {
        Self::InvalidStateTransition { status, operation }
    }
}

impl ArenaError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation(_) => ErrorSeverity::Validation,
            Self::InvalidStateTransition { .. } => ErrorSeverity::Recoverable,
            Self::InvariantViolation(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(inner) => inner.error_code(),
            Self::InvalidStateTransition { .. } => "SESSION_INVALID_TRANSITION",
            Self::InvariantViolation(inner) => inner.error_code(),
        }
    }
}
