//! In-process adapters with seeded state.

pub mod clock;
pub mod prompt;
pub mod store;

pub use clock::FixedClock;
pub use prompt::ScriptedPrompt;
pub use store::{FleetSnapshot, MemoryStore, WriteCall};
