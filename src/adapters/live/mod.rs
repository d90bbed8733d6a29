//! Live adapters for real external interactions.

pub mod clock;
pub mod prompt;
pub mod store;

pub use clock::LiveClock;
pub use prompt::{AssumeYes, TerminalPrompt};
pub use store::RestStore;
