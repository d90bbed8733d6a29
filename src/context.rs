//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::{AssumeYes, LiveClock, RestStore, TerminalPrompt};
use crate::adapters::recording::{RecordingClock, RecordingPrompt, RecordingStore};
use crate::adapters::replaying::{ReplayingClock, ReplayingPrompt, ReplayingStore};
use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::config::StoreConfig;
use crate::error::ConfigError;
use crate::ports::{Clock, ConfirmationPrompt, RecordStore};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// replaying, recording, or anything the caller hands in).
pub struct ServiceContext {
    /// Driver, truck and trailer rows.
    pub store: Box<dyn RecordStore>,
    /// Operator confirmation before a vehicle changes hands.
    pub prompt: Box<dyn ConfirmationPrompt>,
    /// Current time for document expiry.
    pub clock: Box<dyn Clock>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(
        store: Box<dyn RecordStore>,
        prompt: Box<dyn ConfirmationPrompt>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self { store, prompt, clock }
    }

    /// Creates a live context against the hosted backend.
    ///
    /// With `assume_yes` every reassignment is confirmed without asking.
    #[must_use]
    pub fn live(config: StoreConfig, assume_yes: bool) -> Self {
        Self::new(
            Box::new(RestStore::new(config)),
            operator_prompt(assume_yes),
            Box::new(LiveClock),
        )
    }

    /// Wraps every port so its calls are written to `session`.
    ///
    /// This is the developer-only mechanism behind `FLEETDESK_RECORD`.
    #[must_use]
    pub fn recorded(self, session: &RecordingSession) -> Self {
        Self {
            store: Box::new(RecordingStore::new(self.store, Arc::clone(&session.store))),
            prompt: Box::new(RecordingPrompt::new(self.prompt, Arc::clone(&session.prompt))),
            clock: Box::new(RecordingClock::new(self.clock, Arc::clone(&session.clock))),
        }
    }

    /// Creates a replaying context from a monolithic cassette file.
    ///
    /// Each port gets its own replayer from the same cassette so that
    /// per-port cursors are independent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, ConfigError> {
        Self::replaying_from(&CassetteConfig::monolithic(path))
    }

    /// Creates a replaying context from per-port cassette files.
    ///
    /// Ports without a cassette fall back to an adapter that fails the
    /// store call, dismisses the prompt, or panics on the clock.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn replaying_from(config: &CassetteConfig) -> Result<Self, ConfigError> {
        let replayers = config.load_all()?;

        Ok(Self {
            store: Box::new(
                replayers.store.map_or_else(ReplayingStore::unconfigured, ReplayingStore::new),
            ),
            prompt: Box::new(
                replayers.prompt.map_or_else(ReplayingPrompt::unconfigured, ReplayingPrompt::new),
            ),
            clock: Box::new(
                replayers.clock.map_or_else(ReplayingClock::unconfigured, ReplayingClock::new),
            ),
        })
    }
}

/// Terminal prompt, or one that always agrees.
#[must_use]
pub fn operator_prompt(assume_yes: bool) -> Box<dyn ConfirmationPrompt> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt)
    }
}
