//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (time, the record store, the operator).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod prompt;
pub mod store;

pub use clock::Clock;
pub use prompt::{ConfirmationPrompt, PromptFuture, ReassignmentPrompt};
pub use store::{RecordStore, StoreFuture};
