//! Replaying adapters that serve recorded interactions.

pub mod clock;
pub mod prompt;
pub mod store;

pub use clock::ReplayingClock;
pub use prompt::ReplayingPrompt;
pub use store::ReplayingStore;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::{CassetteReplayer, ReplayError};
use crate::error::StoreError;

/// Take the output of the next recorded `port::method` interaction.
///
/// Mirror of `recording::record_interaction`.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, ReplayError> {
    let mut guard = replayer.lock().expect("replayer lock poisoned");
    guard.next_interaction(port, method).map(|i| i.output.clone())
}

/// Decode a recorded `{"ok": v}` / `{"err": "msg"}` output.
///
/// Mirror of `recording::record_result`.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, StoreError> {
    let serde_json::Value::Object(mut map) = output else {
        return Err(StoreError::Decode(format!("expected ok/err object, got {output}")));
    };
    if let Some(value) = map.remove("ok") {
        return serde_json::from_value(value).map_err(|e| StoreError::Decode(e.to_string()));
    }
    match map.remove("err") {
        Some(serde_json::Value::String(message)) => Err(StoreError::Replayed(message)),
        Some(other) => Err(StoreError::Replayed(other.to_string())),
        None => Err(StoreError::Decode("recorded output has neither ok nor err".into())),
    }
}
