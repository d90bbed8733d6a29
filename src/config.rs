//! Environment configuration.
//!
//! Values come from the process environment, after loading a `.env` file
//! from the working directory if one exists.

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Base URL of the hosted backend, e.g. `https://abc.example.co`.
pub const STORE_URL_VAR: &str = "FLEETDESK_STORE_URL";
/// API key sent as `apikey` and bearer token.
pub const STORE_KEY_VAR: &str = "FLEETDESK_STORE_KEY";
/// When set to a directory, every port call is recorded there.
pub const RECORD_VAR: &str = "FLEETDESK_RECORD";
/// `tracing` filter directive, e.g. `fleetdesk=debug`.
pub const LOG_VAR: &str = "FLEETDESK_LOG";

/// Loads `.env` into the environment; a missing file is fine.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
}

/// Connection settings for the live record store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backend base URL without the `/rest/v1` suffix.
    pub url: String,
    /// API key.
    pub api_key: String,
}

impl StoreConfig {
    /// Reads the store settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first unset variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the store settings through an arbitrary lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first unset or blank variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        Ok(Self {
            url: required(STORE_URL_VAR)?.trim_end_matches('/').to_string(),
            api_key: required(STORE_KEY_VAR)?,
        })
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig").field("url", &self.url).field("api_key", &"<redacted>").finish()
    }
}

/// Directory requested for recording, if any.
#[must_use]
pub fn record_dir() -> Option<PathBuf> {
    env::var_os(RECORD_VAR).filter(|v| !v.is_empty()).map(PathBuf::from)
}
