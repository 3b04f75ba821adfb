//! Topic-based event bus for battle events.
//!
//! Every battle owns a bus; the registry keeps one more, the lobby, that only
//! carries lifecycle notices for all battles.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::LifecycleEvent;
