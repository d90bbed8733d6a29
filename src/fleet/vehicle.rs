//! Trucks and trailers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which of a driver's two vehicle slots is being addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    /// A tractor unit, linked through `truck_id`.
    Truck,
    /// A trailer, linked through `trailer_id`.
    Trailer,
}

impl VehicleKind {
    /// Name of the driver column that links to this kind of vehicle.
    #[must_use]
    pub const fn link_field(self) -> &'static str {
        match self {
            Self::Truck => "truck_id",
            Self::Trailer => "trailer_id",
        }
    }

    /// Backend table holding vehicles of this kind.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Truck => "trucks",
            Self::Trailer => "trailers",
        }
    }

    /// Column holding the display number in [`Self::table`].
    #[must_use]
    pub const fn number_column(self) -> &'static str {
        match self {
            Self::Truck => "truck_number",
            Self::Trailer => "trailer_number",
        }
    }

    /// Lowercase word used in sentences ("truck").
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Truck => "truck",
            Self::Trailer => "trailer",
        }
    }

    /// Capitalised word used at the start of a sentence ("Truck").
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Truck => "Truck",
            Self::Trailer => "Trailer",
        }
    }
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

impl FromStr for VehicleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "truck" | "trucks" => Ok(Self::Truck),
            "trailer" | "trailers" => Ok(Self::Trailer),
            other => Err(format!("unknown vehicle kind {other:?} (expected truck or trailer)")),
        }
    }
}

/// Whether a vehicle is in service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    /// Available for assignment.
    #[default]
    Active,
    /// Parked; not offered in driver forms.
    Empty,
}

/// A truck or trailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Row id.
    pub id: String,
    /// Display number, e.g. a plate or fleet number.
    pub number: String,
    /// Service status.
    #[serde(default)]
    pub status: VehicleStatus,
}
