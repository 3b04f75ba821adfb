//! Data-driven battle content and loaders.
//!
//! Rosters (combatant definitions) come from RON or JSON files; arena rules
//! come from TOML. Everything parses straight into arena-core types.
//!
//! Sample files live in this crate's `data/` directory.

pub mod budget;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use budget::{DEFAULT_BUDGET, TraitBudget};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, RosterLoader};
