//! Driver edit form: a local draft plus the two vehicle pickers.
//!
//! The draft is never written by the reconciler. Reassignment only touches
//! *other* drivers' rows; the edited driver reaches storage through
//! [`DriverForm::save`].

use tracing::debug;

use super::selection::VehicleField;
use super::{Reconciler, Resolution};
use crate::error::{ReconcileError, StoreError};
use crate::fleet::{DriverDraft, DriverRecord, VehicleKind};
use crate::ports::RecordStore;

/// Result of choosing a vehicle in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The choice was blank; the field is now empty.
    Cleared,
    /// Nobody else held the vehicle; the draft holds it now.
    Selected,
    /// Another driver holds the vehicle; the operator must confirm.
    NeedsConfirmation(DriverRecord),
}

/// Result of answering a pending confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// No choice was waiting on this field.
    NothingPending,
    /// The operator declined; the field went back to its previous value.
    Declined,
    /// The other holders were released and the draft holds the vehicle.
    Reassigned {
        /// Drivers whose link was cleared.
        released: Vec<String>,
    },
}

/// Result of [`DriverForm::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// An existing driver was updated.
    Updated,
    /// A new driver was inserted.
    Created(DriverRecord),
}

/// The driver form being edited.
#[derive(Debug, Clone)]
pub struct DriverForm {
    editing: Option<String>,
    draft: DriverDraft,
    truck: VehicleField,
    trailer: VehicleField,
}

impl DriverForm {
    /// A form for a driver that does not exist yet.
    #[must_use]
    pub fn create(draft: DriverDraft) -> Self {
        Self::build(None, draft)
    }

    /// A form loaded from a stored driver.
    #[must_use]
    pub fn edit(record: &DriverRecord) -> Self {
        Self::build(Some(record.id.clone()), DriverDraft::from_record(record))
    }

    fn build(editing: Option<String>, draft: DriverDraft) -> Self {
        let truck = VehicleField::new(VehicleKind::Truck, draft.link(VehicleKind::Truck));
        let trailer = VehicleField::new(VehicleKind::Trailer, draft.link(VehicleKind::Trailer));
        Self { editing, draft, truck, trailer }
    }

    /// Id of the driver being edited; `None` while creating.
    #[must_use]
    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// The local draft as it would be saved now.
    #[must_use]
    pub const fn draft(&self) -> &DriverDraft {
        &self.draft
    }

    /// The picker for one slot.
    #[must_use]
    pub const fn field(&self, kind: VehicleKind) -> &VehicleField {
        match kind {
            VehicleKind::Truck => &self.truck,
            VehicleKind::Trailer => &self.trailer,
        }
    }

    fn field_mut(&mut self, kind: VehicleKind) -> &mut VehicleField {
        match kind {
            VehicleKind::Truck => &mut self.truck,
            VehicleKind::Trailer => &mut self.trailer,
        }
    }

    /// The operator picked `vehicle_id` (blank to clear) for a slot.
    ///
    /// Any choice still waiting for confirmation on this slot is dropped
    /// first. A blank choice clears the field without a lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::QueryFailure`] if the conflict check fails;
    /// the field then keeps its previous value.
    pub async fn select(
        &mut self,
        reconciler: &Reconciler<'_>,
        kind: VehicleKind,
        vehicle_id: &str,
    ) -> Result<SelectOutcome, ReconcileError> {
        let vehicle_id = vehicle_id.trim();
        if self.field_mut(kind).cancel_pending() {
            debug!(%kind, "dropped pending choice for new selection");
        }

        if vehicle_id.is_empty() {
            self.field_mut(kind).clear();
            self.draft.set_link(kind, None);
            return Ok(SelectOutcome::Cleared);
        }

        let exclude = self.editing.clone();
        match reconciler.check_conflict(kind, vehicle_id, exclude.as_deref()).await? {
            None => {
                self.field_mut(kind).choose_free(vehicle_id);
                self.draft.set_link(kind, Some(vehicle_id));
                Ok(SelectOutcome::Selected)
            }
            Some(holder) => {
                self.field_mut(kind).await_confirmation(vehicle_id, holder.clone());
                Ok(SelectOutcome::NeedsConfirmation(holder))
            }
        }
    }

    /// The operator answered the confirmation for a slot.
    ///
    /// # Errors
    ///
    /// Returns the reconciler's error if releasing the other holders fails.
    /// The choice then stays pending so the operator can retry or cancel.
    pub async fn confirm(
        &mut self,
        reconciler: &Reconciler<'_>,
        kind: VehicleKind,
        confirmed: bool,
    ) -> Result<ConfirmOutcome, ReconcileError> {
        let Some(vehicle_id) = self.field(kind).pending().map(|(v, _)| v.to_string()) else {
            return Ok(ConfirmOutcome::NothingPending);
        };

        let exclude = self.editing.clone();
        match reconciler.resolve_conflict(kind, &vehicle_id, exclude.as_deref(), confirmed).await? {
            Resolution::Declined => {
                self.field_mut(kind).cancel_pending();
                Ok(ConfirmOutcome::Declined)
            }
            Resolution::Reassigned { released } => {
                self.field_mut(kind).take_over(&vehicle_id);
                self.draft.set_link(kind, Some(&vehicle_id));
                Ok(ConfirmOutcome::Reassigned { released })
            }
        }
    }

    /// Persists the draft: update when editing, insert when creating.
    ///
    /// Choices still pending are saved at their previous value.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the write is rejected.
    pub async fn save(&mut self, store: &dyn RecordStore) -> Result<SaveOutcome, StoreError> {
        let patch = self.draft.to_patch();
        if let Some(id) = &self.editing {
            store.update_driver(id, &patch).await?;
            return Ok(SaveOutcome::Updated);
        }
        let record = store.insert_driver(&patch).await?;
        self.editing = Some(record.id.clone());
        Ok(SaveOutcome::Created(record))
    }
}
