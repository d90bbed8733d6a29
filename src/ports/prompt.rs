//! Confirmation prompt port for operator decisions.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::fleet::VehicleKind;

/// Boxed future type alias used by [`ConfirmationPrompt`].
pub type PromptFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// What the operator is asked before a vehicle is taken from another driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReassignmentPrompt {
    /// Truck or trailer.
    pub vehicle_kind: VehicleKind,
    /// Vehicle number, or `Unknown`.
    pub vehicle_label: String,
    /// Current holder as `"{code} - {full_name}"`.
    pub current_holder_label: String,
}

impl ReassignmentPrompt {
    /// The question as shown to the operator.
    #[must_use]
    pub fn message(&self) -> String {
        let kind = self.vehicle_kind.noun();
        format!(
            "The {kind} {label} is currently assigned to:\n  {holder}\n\
             Do you want to reassign this {kind} to the current driver? \
             This will remove it from the previous driver.",
            label = self.vehicle_label,
            holder = self.current_holder_label,
        )
    }
}

/// Asks the operator to confirm a reassignment.
///
/// Abstracting the prompt keeps the reassignment flow testable without a
/// terminal. Dismissing the prompt answers `false`.
pub trait ConfirmationPrompt: Send + Sync {
    /// Resolves to `true` once the operator agrees, `false` otherwise.
    fn confirm<'a>(&'a self, request: &'a ReassignmentPrompt) -> PromptFuture<'a>;
}
