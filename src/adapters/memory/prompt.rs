//! Prompt that answers from a script.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{ConfirmationPrompt, PromptFuture, ReassignmentPrompt};

/// Answers confirmations from a queue and remembers every question.
///
/// Once the queue runs dry every further question is dismissed.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<ReassignmentPrompt>>,
}

impl ScriptedPrompt {
    /// A prompt that gives the listed answers in order.
    #[must_use]
    pub fn answering(answers: impl IntoIterator<Item = bool>) -> Self {
        Self { answers: Mutex::new(answers.into_iter().collect()), asked: Mutex::default() }
    }

    /// Questions asked so far.
    #[must_use]
    pub fn asked(&self) -> Vec<ReassignmentPrompt> {
        self.asked.lock().expect("prompt lock poisoned").clone()
    }
}

impl ConfirmationPrompt for ScriptedPrompt {
    fn confirm<'a>(&'a self, request: &'a ReassignmentPrompt) -> PromptFuture<'a> {
        self.asked.lock().expect("prompt lock poisoned").push(request.clone());
        let answer =
            self.answers.lock().expect("prompt lock poisoned").pop_front().unwrap_or(false);
        Box::pin(std::future::ready(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::VehicleKind;

    #[tokio::test]
    async fn answers_in_order_then_dismisses() {
        let prompt = ScriptedPrompt::answering([true]);
        let request = ReassignmentPrompt {
            vehicle_kind: VehicleKind::Truck,
            vehicle_label: "T-1".into(),
            current_holder_label: "D01 - A".into(),
        };
        assert!(prompt.confirm(&request).await);
        assert!(!prompt.confirm(&request).await);
        assert_eq!(prompt.asked().len(), 2);
    }
}
