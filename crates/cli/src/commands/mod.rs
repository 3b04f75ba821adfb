mod inspect;
mod live;
mod run;

pub use inspect::Inspect;
pub use live::Live;
pub use run::Run;
