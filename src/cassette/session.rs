//! Recording session managing per-port cassette recorders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;
use crate::error::ConfigError;

/// Manages per-port `CassetteRecorder` instances for a recording session.
///
/// Each port gets its own recorder writing to a separate cassette file.
/// All cassettes are stored in a timestamped directory.
pub struct RecordingSession {
    /// Recorder for record store interactions.
    pub store: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for confirmation prompt answers.
    pub prompt: Arc<Mutex<CassetteRecorder>>,
    /// Recorder for clock readings.
    pub clock: Arc<Mutex<CassetteRecorder>>,
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a session writing to `<root>/<timestamp>/`.
    ///
    /// `source` is stored in every cassette to say what was recorded
    /// against, usually the backend URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory already exists or cannot be created.
    pub fn new(root: &Path, source: &str) -> Result<Self, ConfigError> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let output_dir = root.join(&timestamp);

        if output_dir.exists() {
            return Err(ConfigError::Recording(format!(
                "cassette directory already exists: {}",
                output_dir.display()
            )));
        }

        std::fs::create_dir_all(&output_dir).map_err(|e| {
            ConfigError::Recording(format!("failed to create {}: {e}", output_dir.display()))
        })?;

        let make_recorder = |port: &str| -> Arc<Mutex<CassetteRecorder>> {
            let path = output_dir.join(format!("{port}.cassette.yaml"));
            let name = format!("{timestamp}-{port}");
            Arc::new(Mutex::new(CassetteRecorder::new(path, name, source)))
        };

        Ok(Self {
            store: make_recorder("store"),
            prompt: make_recorder("prompt"),
            clock: make_recorder("clock"),
            output_dir,
        })
    }

    /// Directory the cassettes will be written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// The recording adapters must have been dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter is still alive or a file cannot be written.
    pub fn finish(self) -> Result<PathBuf, ConfigError> {
        fn finish_one(arc: Arc<Mutex<CassetteRecorder>>, port: &str) -> Result<(), ConfigError> {
            let recorder = Arc::try_unwrap(arc)
                .map_err(|_| {
                    ConfigError::Recording(format!("recording adapter for {port} still in use"))
                })?
                .into_inner()
                .map_err(|e| ConfigError::Recording(format!("recorder for {port} poisoned: {e}")))?;
            let count = recorder.len();
            let path = recorder.finish().map_err(|e| {
                ConfigError::Recording(format!("failed to write {port} cassette: {e}"))
            })?;
            tracing::debug!(port, count, path = %path.display(), "cassette written");
            Ok(())
        }

        finish_one(self.store, "store")?;
        finish_one(self.prompt, "prompt")?;
        finish_one(self.clock, "clock")?;

        Ok(self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_creates_output_directory_and_finishes() {
        let root = std::env::temp_dir().join("fleetdesk_session_test");
        let session = RecordingSession::new(&root, "memory").unwrap();
        let dir = session.output_dir().to_path_buf();
        assert!(dir.exists());

        session.store.lock().unwrap().record(
            "store",
            "list_drivers",
            serde_json::json!({}),
            serde_json::json!({"ok": []}),
        );

        let written = session.finish().unwrap();
        assert_eq!(written, dir);
        assert!(dir.join("store.cassette.yaml").exists());
        assert!(dir.join("prompt.cassette.yaml").exists());
        assert!(dir.join("clock.cassette.yaml").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn finish_fails_while_an_adapter_holds_a_recorder() {
        let root = std::env::temp_dir().join("fleetdesk_session_busy_test");
        let session = RecordingSession::new(&root, "memory").unwrap();
        let held = Arc::clone(&session.prompt);
        let err = session.finish().unwrap_err();
        assert!(err.to_string().contains("prompt"));
        drop(held);
        let _ = std::fs::remove_dir_all(&root);
    }
}
