//! Public runtime API surface.
//!
//! Types handed to consumers of the runtime crate: the battle handle and the
//! error type every async call returns.

pub mod errors;
pub mod handle;

pub use errors::{Result, RuntimeError};
pub use handle::BattleHandle;
