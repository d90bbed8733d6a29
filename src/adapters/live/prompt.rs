//! Live adapters for the `ConfirmationPrompt` port.

use std::io::{self, BufRead, Write};

use tracing::info;

use crate::ports::{ConfirmationPrompt, PromptFuture, ReassignmentPrompt};

/// Asks on the terminal: question on stderr, answer from stdin.
///
/// Anything but `y`/`yes` (including end of input) declines.
pub struct TerminalPrompt;

impl ConfirmationPrompt for TerminalPrompt {
    fn confirm<'a>(&'a self, request: &'a ReassignmentPrompt) -> PromptFuture<'a> {
        let message = request.message();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || ask(&message)).await.unwrap_or(false)
        })
    }
}

fn ask(message: &str) -> bool {
    let mut stderr = io::stderr();
    if write!(stderr, "{message} [y/N] ").and_then(|()| stderr.flush()).is_err() {
        return false;
    }
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_yes(&line),
    }
}

/// Whether a typed answer confirms.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Confirms everything without asking (`--yes`).
pub struct AssumeYes;

impl ConfirmationPrompt for AssumeYes {
    fn confirm<'a>(&'a self, request: &'a ReassignmentPrompt) -> PromptFuture<'a> {
        info!(
            kind = %request.vehicle_kind,
            vehicle = %request.vehicle_label,
            holder = %request.current_holder_label,
            "reassignment confirmed by --yes"
        );
        Box::pin(std::future::ready(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::VehicleKind;

    #[test]
    fn only_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[tokio::test]
    async fn assume_yes_confirms() {
        let request = ReassignmentPrompt {
            vehicle_kind: VehicleKind::Truck,
            vehicle_label: "T-100".into(),
            current_holder_label: "D01 - Amal".into(),
        };
        assert!(AssumeYes.confirm(&request).await);
    }
}
