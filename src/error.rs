//! Error types for fleetdesk.

use thiserror::Error;

use crate::fleet::VehicleKind;

/// Errors raised by a record store adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The request never produced a response (network, TLS, timeout).
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Backend-supplied message, or the raw body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No row with the given id exists.
    #[error("{table} record {id} not found")]
    NotFound {
        /// Table that was addressed.
        table: &'static str,
        /// Row id.
        id: String,
    },

    /// An error string served back from a cassette.
    #[error("{0}")]
    Replayed(String),
}

/// Errors surfaced by the vehicle assignment reconciler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// Looking up the current holders of a vehicle failed.
    #[error("failed to look up {kind} holders: {source}")]
    QueryFailure {
        /// Vehicle kind being checked.
        kind: VehicleKind,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },

    /// A clearing update failed. Links listed in `cleared` stay cleared.
    #[error("failed to release {kind} from driver {driver_id}: {source}")]
    PartialReassignment {
        /// Vehicle kind being reassigned.
        kind: VehicleKind,
        /// Driver whose link could not be cleared.
        driver_id: String,
        /// Drivers whose links were already cleared before the failure.
        cleared: Vec<String>,
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("{0} is not set; add it to the environment or a .env file")]
    Missing(&'static str),

    /// A cassette file could not be loaded.
    #[error("failed to load cassette {path}: {reason}")]
    Cassette {
        /// Cassette path as given.
        path: String,
        /// Read or parse failure.
        reason: String,
    },

    /// Recording could not be set up or finished.
    #[error("recording failed: {0}")]
    Recording(String),

    /// A fleet fixture file could not be read or written.
    #[error("fixture {path}: {reason}")]
    Fixture {
        /// Fixture path as given.
        path: String,
        /// I/O or YAML failure.
        reason: String,
    },
}

/// Top-level error returned by command handlers.
#[derive(Debug, Error)]
pub enum Error {
    /// Command-line parsing failed.
    #[error("{0}")]
    Usage(String),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Record store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Reconciler error.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// A driver id given on the command line does not exist.
    #[error("driver {0} not found")]
    UnknownDriver(String),

    /// A vehicle given on the command line matches no active vehicle.
    #[error("no active {kind} matches {key}")]
    UnknownVehicle {
        /// Vehicle kind searched.
        kind: VehicleKind,
        /// Id or number as given.
        key: String,
    },

    /// An operator-facing step failed; the message is the notice text.
    #[error("{0}")]
    Failed(String),

    /// Logging could not be initialised.
    #[error("failed to initialize tracing subscriber: {0}")]
    Tracing(String),
}

/// Convenience alias for results carrying the crate error.
pub type Result<T> = std::result::Result<T, Error>;
