//! The operator-facing assignment flow.
//!
//! Ties the form, the reconciler and the confirmation prompt together and
//! turns every failure into a [`Notice`] instead of an error, so a failed
//! lookup or clear never aborts the surrounding form session.

use std::fmt;

use tracing::warn;

use super::form::{ConfirmOutcome, DriverForm, SaveOutcome, SelectOutcome};
use super::Reconciler;
use crate::error::ReconcileError;
use crate::fleet::VehicleKind;
use crate::ports::{ConfirmationPrompt, ReassignmentPrompt, RecordStore};

const UNKNOWN_VEHICLE: &str = "Unknown";

/// A message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Something worked.
    Success(String),
    /// Something failed; the form is still usable.
    Error(String),
}

impl Notice {
    /// True for [`Notice::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(msg) | Self::Error(msg) => f.write_str(msg),
        }
    }
}

/// How a vehicle choice ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// The field was emptied.
    Cleared,
    /// The vehicle was free and is now in the draft.
    Selected,
    /// The vehicle was taken from other drivers and is now in the draft.
    Reassigned {
        /// Drivers whose link was cleared.
        released: Vec<String>,
    },
    /// The operator declined; the field kept its previous value.
    Declined,
    /// A lookup or clear failed.
    Failed(ReconcileError),
}

/// Outcome of [`assign_vehicle`] plus the notices to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// How the choice ended.
    pub outcome: AssignmentOutcome,
    /// Messages for the operator, in order.
    pub notices: Vec<Notice>,
}

impl Assignment {
    fn new(outcome: AssignmentOutcome) -> Self {
        Self { outcome, notices: Vec::new() }
    }

    fn failed(error: ReconcileError, message: String) -> Self {
        Self { outcome: AssignmentOutcome::Failed(error), notices: vec![Notice::Error(message)] }
    }

    /// True when the draft changed and should be saved.
    #[must_use]
    pub const fn changed_draft(&self) -> bool {
        matches!(
            self.outcome,
            AssignmentOutcome::Cleared
                | AssignmentOutcome::Selected
                | AssignmentOutcome::Reassigned { .. }
        )
    }
}

/// Run one vehicle choice to completion, asking the operator on conflict.
pub async fn assign_vehicle(
    store: &dyn RecordStore,
    prompt: &dyn ConfirmationPrompt,
    form: &mut DriverForm,
    kind: VehicleKind,
    vehicle_id: &str,
) -> Assignment {
    let reconciler = Reconciler::new(store);

    let holder = match form.select(&reconciler, kind, vehicle_id).await {
        Ok(SelectOutcome::Cleared) => return Assignment::new(AssignmentOutcome::Cleared),
        Ok(SelectOutcome::Selected) => return Assignment::new(AssignmentOutcome::Selected),
        Ok(SelectOutcome::NeedsConfirmation(holder)) => holder,
        Err(e) => {
            let message = format!("Error checking {kind} assignment: {}", cause(&e));
            return Assignment::failed(e, message);
        }
    };

    let request = ReassignmentPrompt {
        vehicle_kind: kind,
        vehicle_label: vehicle_label(store, kind, vehicle_id.trim()).await,
        current_holder_label: holder.label(),
    };
    let confirmed = prompt.confirm(&request).await;

    match form.confirm(&reconciler, kind, confirmed).await {
        Ok(ConfirmOutcome::Reassigned { released }) => Assignment {
            outcome: AssignmentOutcome::Reassigned { released },
            notices: vec![Notice::Success(format!("{} reassigned successfully", kind.title()))],
        },
        Ok(ConfirmOutcome::Declined | ConfirmOutcome::NothingPending) => {
            Assignment::new(AssignmentOutcome::Declined)
        }
        Err(e) => {
            let message = format!("Error reassigning {kind}: {}", cause(&e));
            Assignment::failed(e, message)
        }
    }
}

/// Empty a slot; no lookup or confirmation is involved.
pub async fn release_vehicle(
    store: &dyn RecordStore,
    form: &mut DriverForm,
    kind: VehicleKind,
) -> Assignment {
    let reconciler = Reconciler::new(store);
    match form.select(&reconciler, kind, "").await {
        Ok(_) => Assignment::new(AssignmentOutcome::Cleared),
        Err(e) => {
            let message = format!("Error checking {kind} assignment: {}", cause(&e));
            Assignment::failed(e, message)
        }
    }
}

/// Save the form and report the result as a notice.
pub async fn save_form(store: &dyn RecordStore, form: &mut DriverForm) -> Notice {
    match form.save(store).await {
        Ok(SaveOutcome::Updated) => Notice::Success("Driver updated successfully".into()),
        Ok(SaveOutcome::Created(_)) => Notice::Success("Driver created successfully".into()),
        Err(e) => {
            warn!(error = %e, "driver save failed");
            Notice::Error(format!("Error saving driver: {e}"))
        }
    }
}

/// Display number of a vehicle from the active list, or `Unknown`.
async fn vehicle_label(store: &dyn RecordStore, kind: VehicleKind, vehicle_id: &str) -> String {
    match store.list_vehicles(kind).await {
        Ok(vehicles) => vehicles
            .into_iter()
            .find(|v| v.id == vehicle_id)
            .map_or_else(|| UNKNOWN_VEHICLE.to_string(), |v| v.number),
        Err(e) => {
            warn!(%kind, error = %e, "could not load vehicle list for label");
            UNKNOWN_VEHICLE.to_string()
        }
    }
}

/// The store message behind a reconciler error.
fn cause(error: &ReconcileError) -> String {
    match error {
        ReconcileError::QueryFailure { source, .. }
        | ReconcileError::PartialReassignment { source, .. } => source.to_string(),
    }
}
