//! Fleet record types.
//!
//! Mirrors the backend's `drivers`, `trucks` and `trailers` rows. A driver
//! points at its truck and trailer through nullable link fields; vehicles
//! carry no back-reference, so the holder of a vehicle is found by scanning
//! drivers.

mod document;
mod driver;
mod vehicle;

pub use document::{document_status, DocumentStatus};
pub use driver::{DriverDraft, DriverPatch, DriverRecord, DriverStatus};
pub use vehicle::{Vehicle, VehicleKind, VehicleStatus};
