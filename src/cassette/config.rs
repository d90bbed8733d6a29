//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;
use crate::error::ConfigError;

/// Per-port cassette file paths. Ports without a cassette path panic (clock)
/// or fail (store) if called during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the record store cassette file.
    pub store: Option<PathBuf>,
    /// Path to the confirmation prompt cassette file.
    pub prompt: Option<PathBuf>,
    /// Path to the clock cassette file.
    pub clock: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the record store.
    pub store: Option<CassetteReplayer>,
    /// Replayer for the confirmation prompt.
    pub prompt: Option<CassetteReplayer>,
    /// Replayer for the clock.
    pub clock: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Uses one cassette file for every port.
    #[must_use]
    pub fn monolithic(path: &Path) -> Self {
        Self {
            store: Some(path.to_path_buf()),
            prompt: Some(path.to_path_buf()),
            clock: Some(path.to_path_buf()),
        }
    }

    /// Load a cassette file and create a replayer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Cassette`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<CassetteReplayer, ConfigError> {
        let failed = |reason: String| ConfigError::Cassette { path: path.display().to_string(), reason };
        let content = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
        let cassette: Cassette =
            serde_yaml::from_str(&content).map_err(|e| failed(e.to_string()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, ConfigError> {
        Ok(PortReplayers {
            store: self.store.as_deref().map(Self::load).transpose()?,
            prompt: self.prompt.as_deref().map(Self::load).transpose()?,
            clock: self.clock.as_deref().map(Self::load).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn write_cassette(path: &Path, interactions: Vec<Interaction>) {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            source: "memory".into(),
            interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).unwrap();
        std::fs::write(path, yaml).unwrap();
    }

    fn interaction(port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq: 0, port: port.into(), method: method.into(), input: json!({}), output }
    }

    #[test]
    fn monolithic_cassette_feeds_every_port() {
        let dir = std::env::temp_dir().join("fleetdesk_config_test_mono");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("full.cassette.yaml");
        write_cassette(
            &path,
            vec![
                interaction("store", "list_drivers", json!({"ok": []})),
                interaction("prompt", "confirm", json!(false)),
            ],
        );

        let mut replayers = CassetteConfig::monolithic(&path).load_all().unwrap();
        let store = replayers.store.as_mut().unwrap();
        assert_eq!(
            store.next_interaction("store", "list_drivers").unwrap().output,
            json!({"ok": []})
        );
        let prompt = replayers.prompt.as_mut().unwrap();
        assert_eq!(prompt.next_interaction("prompt", "confirm").unwrap().output, json!(false));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unconfigured_ports_have_no_replayer() {
        let dir = std::env::temp_dir().join("fleetdesk_config_test_ports");
        std::fs::create_dir_all(&dir).unwrap();
        let store_path = dir.join("store.cassette.yaml");
        write_cassette(&store_path, vec![interaction("store", "list_drivers", json!({"ok": []}))]);

        let config = CassetteConfig { store: Some(store_path), ..CassetteConfig::default() };
        let replayers = config.load_all().unwrap();
        assert!(replayers.store.is_some());
        assert!(replayers.prompt.is_none());
        assert!(replayers.clock.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = CassetteConfig::load(Path::new("/nonexistent/none.cassette.yaml"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/none.cassette.yaml"));
    }
}
