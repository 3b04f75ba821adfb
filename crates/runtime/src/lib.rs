//! Async hosting for arena battles.
//!
//! Each battle runs inside its own worker task that owns the
//! [`arena_core::BattleSession`]. Callers talk to it through a cloneable
//! [`BattleHandle`] and watch it through the topic-based [`EventBus`]. The
//! [`SessionRegistry`] starts battles, tracks the live ones and retires
//! finished ones after a grace period.
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the handle and error types
//! - [`config`] holds [`RuntimeConfig`] and its environment overrides
//! - [`events`] provides the per-battle and lobby event buses
//! - [`registry`] owns the table of live battles
//! - `workers` keeps the battle task internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod registry;

mod workers;

pub use api::{BattleHandle, Result, RuntimeError};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, LifecycleEvent, Topic};
pub use registry::{BattleSummary, SessionRegistry};
