//! Adapter implementations of the port traits.
//!
//! - `live`: the hosted backend, the terminal, the system clock.
//! - `memory`: seeded in-process fakes for tests and dry runs.
//! - `recording`: wrappers that write every call to a cassette.
//! - `replaying`: cassette-backed stand-ins that need no network.

pub mod live;
pub mod memory;
pub mod recording;
pub mod replaying;
