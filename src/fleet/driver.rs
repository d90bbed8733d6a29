//! Driver rows, partial updates, and the local edit draft.

use serde::{Deserialize, Deserializer, Serialize};

use super::VehicleKind;

/// Employment status of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverStatus {
    /// Working.
    #[default]
    Active,
    /// On leave.
    Vacation,
    /// No longer employed.
    Cancelled,
}

impl DriverStatus {
    /// Lowercase label as stored by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Vacation => "vacation",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A persisted driver row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    /// Row id.
    pub id: String,
    /// Short human identifier, e.g. `D-014`.
    pub code: String,
    /// Full name.
    pub full_name: String,
    /// Contact number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Gate pass expiry date (`YYYY-MM-DD`).
    #[serde(default)]
    pub gatepass: Option<String>,
    /// Power-of-attorney (waqala) expiry date (`YYYY-MM-DD`).
    #[serde(default)]
    pub waqala: Option<String>,
    /// Linked truck, if any.
    #[serde(default)]
    pub truck_id: Option<String>,
    /// Linked trailer, if any.
    #[serde(default)]
    pub trailer_id: Option<String>,
    /// Employing company, if any.
    #[serde(default)]
    pub company_id: Option<String>,
    /// Employment status.
    #[serde(default)]
    pub status: DriverStatus,
}

impl DriverRecord {
    /// The vehicle this driver holds in the given slot.
    #[must_use]
    pub fn link(&self, kind: VehicleKind) -> Option<&str> {
        match kind {
            VehicleKind::Truck => self.truck_id.as_deref(),
            VehicleKind::Trailer => self.trailer_id.as_deref(),
        }
    }

    /// Label shown to an operator: `"{code} - {full_name}"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.full_name)
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &DriverPatch) {
        if let Some(code) = &patch.code {
            self.code.clone_from(code);
        }
        if let Some(full_name) = &patch.full_name {
            self.full_name.clone_from(full_name);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        overwrite(&mut self.phone, &patch.phone);
        overwrite(&mut self.gatepass, &patch.gatepass);
        overwrite(&mut self.waqala, &patch.waqala);
        overwrite(&mut self.truck_id, &patch.truck_id);
        overwrite(&mut self.trailer_id, &patch.trailer_id);
        overwrite(&mut self.company_id, &patch.company_id);
    }
}

fn overwrite(slot: &mut Option<String>, change: &Option<Option<String>>) {
    if let Some(value) = change {
        slot.clone_from(value);
    }
}

/// A partial driver update.
///
/// Nullable columns use `Option<Option<_>>`: `None` leaves the column alone,
/// `Some(None)` writes `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverPatch {
    /// New code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// New full name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// New phone.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    /// New gate pass expiry.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub gatepass: Option<Option<String>>,
    /// New waqala expiry.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub waqala: Option<Option<String>>,
    /// New truck link.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub truck_id: Option<Option<String>>,
    /// New trailer link.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub trailer_id: Option<Option<String>>,
    /// New company.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub company_id: Option<Option<String>>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DriverStatus>,
}

impl DriverPatch {
    /// A patch that sets one link field to `null` and touches nothing else.
    #[must_use]
    pub fn clear_link(kind: VehicleKind) -> Self {
        Self::link(kind, None)
    }

    /// A patch that sets one link field.
    #[must_use]
    pub fn link(kind: VehicleKind, vehicle_id: Option<String>) -> Self {
        match kind {
            VehicleKind::Truck => Self { truck_id: Some(vehicle_id), ..Self::default() },
            VehicleKind::Trailer => Self { trailer_id: Some(vehicle_id), ..Self::default() },
        }
    }

    /// True when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Distinguishes an explicit `null` from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Local, unsaved state of the driver edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDraft {
    /// Short human identifier.
    pub code: String,
    /// Full name.
    pub full_name: String,
    /// Contact number; blank means none.
    #[serde(default)]
    pub phone: String,
    /// Gate pass expiry; blank means none.
    #[serde(default)]
    pub gatepass: String,
    /// Waqala expiry; blank means none.
    #[serde(default)]
    pub waqala: String,
    /// Selected truck; blank means none.
    #[serde(default)]
    pub truck_id: String,
    /// Selected trailer; blank means none.
    #[serde(default)]
    pub trailer_id: String,
    /// Employing company; blank means none.
    #[serde(default)]
    pub company_id: String,
    /// Employment status.
    #[serde(default)]
    pub status: DriverStatus,
}

impl DriverDraft {
    /// A blank draft for a new driver.
    #[must_use]
    pub fn new(code: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self { code: code.into(), full_name: full_name.into(), ..Self::default() }
    }

    /// Load an existing driver into the form.
    #[must_use]
    pub fn from_record(record: &DriverRecord) -> Self {
        Self {
            code: record.code.clone(),
            full_name: record.full_name.clone(),
            phone: record.phone.clone().unwrap_or_default(),
            gatepass: date_part(record.gatepass.as_deref()),
            waqala: date_part(record.waqala.as_deref()),
            truck_id: record.truck_id.clone().unwrap_or_default(),
            trailer_id: record.trailer_id.clone().unwrap_or_default(),
            company_id: record.company_id.clone().unwrap_or_default(),
            status: record.status,
        }
    }

    /// The selected vehicle in the given slot.
    #[must_use]
    pub fn link(&self, kind: VehicleKind) -> Option<&str> {
        let value = match kind {
            VehicleKind::Truck => &self.truck_id,
            VehicleKind::Trailer => &self.trailer_id,
        };
        (!value.is_empty()).then_some(value.as_str())
    }

    /// Set or clear the selected vehicle in the given slot.
    pub fn set_link(&mut self, kind: VehicleKind, vehicle_id: Option<&str>) {
        let value = vehicle_id.unwrap_or_default().to_string();
        match kind {
            VehicleKind::Truck => self.truck_id = value,
            VehicleKind::Trailer => self.trailer_id = value,
        }
    }

    /// Full-row patch used by the driver save; blank fields become `null`.
    #[must_use]
    pub fn to_patch(&self) -> DriverPatch {
        DriverPatch {
            code: Some(self.code.clone()),
            full_name: Some(self.full_name.clone()),
            phone: Some(blank_to_none(&self.phone)),
            gatepass: Some(blank_to_none(&self.gatepass)),
            waqala: Some(blank_to_none(&self.waqala)),
            truck_id: Some(blank_to_none(&self.truck_id)),
            trailer_id: Some(blank_to_none(&self.trailer_id)),
            company_id: Some(blank_to_none(&self.company_id)),
            status: Some(self.status),
        }
    }
}

fn blank_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Keeps the `YYYY-MM-DD` part of a stored date or timestamp.
fn date_part(value: Option<&str>) -> String {
    value.map(|v| v.split('T').next().unwrap_or(v).to_string()).unwrap_or_default()
}
