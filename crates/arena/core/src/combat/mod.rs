//! Combat resolution system.
//!
//! Pure functions that turn two stat blocks and a few random draws into an
//! attack result. Applying that result to a combatant (health, knockback,
//! stun) is the step engine's job.

pub mod resolve;

pub use resolve::{
    AttackOutcome, AttackResult, BLOCK_FACTOR, CRITICAL_MULTIPLIER, MIN_DAMAGE, resolve_attack,
};
