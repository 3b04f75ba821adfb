//! Background tasks that own battle state.

mod battle;

pub use battle::{BattleWorker, Command};
