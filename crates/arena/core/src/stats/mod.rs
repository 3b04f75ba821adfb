//! Trait model.
//!
//! Converts the four designer-facing traits (0–100) into the derived stats the
//! rest of the engine reads:
//!
//! ```text
//! TraitInput (raw, optional fields)
//!     │ resolve()
//!     ▼
//! TraitSet (validated, immutable)
//!     │ DerivedStats::from_traits()
//!     ▼
//! DerivedStats (cached on the combatant)
//! ```

pub mod derived;
pub mod traits;

pub use derived::DerivedStats;
pub use traits::{TraitError, TraitInput, TraitKind, TraitSet};
