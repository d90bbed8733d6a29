//! Recording adapter for the `ConfirmationPrompt` port.

use std::sync::{Arc, Mutex};

use super::record_interaction;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{ConfirmationPrompt, PromptFuture, ReassignmentPrompt};

/// Records the operator's answers while delegating to an inner prompt.
pub struct RecordingPrompt {
    inner: Box<dyn ConfirmationPrompt>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingPrompt {
    /// Creates a new recording prompt wrapping the given implementation.
    pub fn new(
        inner: Box<dyn ConfirmationPrompt>,
        recorder: Arc<Mutex<CassetteRecorder>>,
    ) -> Self {
        Self { inner, recorder }
    }
}

impl ConfirmationPrompt for RecordingPrompt {
    fn confirm<'a>(&'a self, request: &'a ReassignmentPrompt) -> PromptFuture<'a> {
        Box::pin(async move {
            let answer = self.inner.confirm(request).await;
            record_interaction(&self.recorder, "prompt", "confirm", request, &answer);
            answer
        })
    }
}
