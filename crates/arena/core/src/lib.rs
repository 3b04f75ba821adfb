//! Deterministic combat simulation for trait-driven arena battles.
//!
//! `arena-core` defines the canonical rules (trait model, attack resolution,
//! targeting, per-tick stepping) and the [`session::BattleSession`] state
//! machine that owns one battle. Everything here is pure: randomness comes in
//! through [`rng::RandomSource`], and no I/O happens inside a tick. Runtime and
//! transport layers depend on the types re-exported here.
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod report;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod targeting;

pub use combat::{AttackOutcome, AttackResult, resolve_attack};
pub use config::{ArenaConfig, CooldownRules, SpawnLayout, StunRules};
pub use engine::{Conclusion, EndReason, InvariantViolation, Quantity, TickOutcome};
pub use error::{ArenaError, ErrorSeverity, SessionError, SessionOp, ValidationError};
pub use event::{BattleEvent, EventKind};
pub use report::{BattleReport, ReportEntry};
pub use rng::{RandomSource, ScriptedRng, SessionRng};
pub use session::BattleSession;
pub use snapshot::{BattleSnapshot, CombatantSnapshot};
pub use state::{
    BattleId, BattleState, BattleStatus, CombatTally, Combatant, CombatantId, CombatantSpec,
    LastAction, Vec2,
};
pub use stats::{DerivedStats, TraitError, TraitInput, TraitKind, TraitSet};
pub use targeting::{TargetingTier, select_target};
