//! Per-field selection state for the driver form's truck and trailer pickers.

use crate::fleet::{DriverRecord, VehicleKind};

/// Where one vehicle picker stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// No vehicle chosen.
    Unselected,
    /// Chosen, and nobody else held it.
    SelectedNoConflict {
        /// Chosen vehicle.
        vehicle_id: String,
    },
    /// Chosen, but another driver holds it; waiting for the operator.
    PendingConfirmation {
        /// Vehicle awaiting confirmation.
        vehicle_id: String,
        /// Driver currently holding it.
        holder: DriverRecord,
        /// Value the field had before this choice; restored on cancel.
        previous: Option<String>,
    },
    /// Chosen, either loaded from storage or taken over after confirmation.
    Selected {
        /// Chosen vehicle.
        vehicle_id: String,
    },
}

impl SelectionState {
    /// Vehicle the draft currently holds for this field.
    ///
    /// A pending choice is not held yet, so this reports the previous value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Unselected => None,
            Self::SelectedNoConflict { vehicle_id } | Self::Selected { vehicle_id } => {
                Some(vehicle_id)
            }
            Self::PendingConfirmation { previous, .. } => previous.as_deref(),
        }
    }

    /// True while waiting on the operator.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::PendingConfirmation { .. })
    }
}

/// One vehicle picker of the driver form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleField {
    kind: VehicleKind,
    state: SelectionState,
}

impl VehicleField {
    /// A field starting from a stored value.
    #[must_use]
    pub fn new(kind: VehicleKind, current: Option<&str>) -> Self {
        let state = match current {
            Some(id) if !id.is_empty() => SelectionState::Selected { vehicle_id: id.to_string() },
            _ => SelectionState::Unselected,
        };
        Self { kind, state }
    }

    /// Which slot this field edits.
    #[must_use]
    pub const fn kind(&self) -> VehicleKind {
        self.kind
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Settled value; see [`SelectionState::value`].
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.state.value()
    }

    /// Vehicle and holder of a pending choice.
    #[must_use]
    pub fn pending(&self) -> Option<(&str, &DriverRecord)> {
        match &self.state {
            SelectionState::PendingConfirmation { vehicle_id, holder, .. } => {
                Some((vehicle_id, holder))
            }
            _ => None,
        }
    }

    /// Drops a pending choice and restores the previous value.
    ///
    /// Returns `true` when something was pending.
    pub fn cancel_pending(&mut self) -> bool {
        let SelectionState::PendingConfirmation { previous, .. } = &self.state else {
            return false;
        };
        self.state = match previous {
            Some(id) => SelectionState::Selected { vehicle_id: id.clone() },
            None => SelectionState::Unselected,
        };
        true
    }

    pub(super) fn clear(&mut self) {
        self.state = SelectionState::Unselected;
    }

    pub(super) fn choose_free(&mut self, vehicle_id: &str) {
        self.state = SelectionState::SelectedNoConflict { vehicle_id: vehicle_id.to_string() };
    }

    pub(super) fn await_confirmation(&mut self, vehicle_id: &str, holder: DriverRecord) {
        let previous = self.value().map(str::to_string);
        self.state = SelectionState::PendingConfirmation {
            vehicle_id: vehicle_id.to_string(),
            holder,
            previous,
        };
    }

    pub(super) fn take_over(&mut self, vehicle_id: &str) {
        self.state = SelectionState::Selected { vehicle_id: vehicle_id.to_string() };
    }
}
