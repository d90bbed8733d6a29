//! Replaying adapter for the `ConfirmationPrompt` port.

use std::sync::Mutex;

use tracing::warn;

use super::next_output;
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{ConfirmationPrompt, PromptFuture, ReassignmentPrompt};

/// Answers confirmations with the recorded operator decisions.
///
/// A missing or malformed answer dismisses the prompt.
pub struct ReplayingPrompt {
    replayer: Option<Mutex<CassetteReplayer>>,
}

impl ReplayingPrompt {
    /// Creates a replaying prompt backed by the given replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Some(Mutex::new(replayer)) }
    }

    /// A prompt with no cassette; every question is dismissed.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }

    fn answer(&self, request: &ReassignmentPrompt) -> bool {
        let Some(replayer) = self.replayer.as_ref() else {
            warn!(vehicle = %request.vehicle_label, "no prompt cassette; dismissing");
            return false;
        };
        match next_output(replayer, "prompt", "confirm") {
            Ok(serde_json::Value::Bool(answer)) => answer,
            Ok(other) => {
                warn!(output = %other, "recorded prompt answer is not a boolean; dismissing");
                false
            }
            Err(e) => {
                warn!(error = %e, "no recorded prompt answer; dismissing");
                false
            }
        }
    }
}

impl ConfirmationPrompt for ReplayingPrompt {
    fn confirm<'a>(&'a self, request: &'a ReassignmentPrompt) -> PromptFuture<'a> {
        let answer = self.answer(request);
        Box::pin(std::future::ready(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::fleet::VehicleKind;
    use chrono::Utc;
    use serde_json::json;

    fn request() -> ReassignmentPrompt {
        ReassignmentPrompt {
            vehicle_kind: VehicleKind::Truck,
            vehicle_label: "T-100".into(),
            current_holder_label: "D01 - Amal".into(),
        }
    }

    #[tokio::test]
    async fn serves_recorded_answers_then_dismisses() {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            source: "memory".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "prompt".into(),
                method: "confirm".into(),
                input: json!({}),
                output: json!(true),
            }],
        };
        let prompt = ReplayingPrompt::new(CassetteReplayer::new(&cassette));
        assert!(prompt.confirm(&request()).await);
        assert!(!prompt.confirm(&request()).await);
    }

    #[tokio::test]
    async fn unconfigured_prompt_dismisses() {
        assert!(!ReplayingPrompt::unconfigured().confirm(&request()).await);
    }
}
