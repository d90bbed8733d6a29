//! Expiry status for driver documents (gate pass, waqala).

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days before expiry at which a document counts as expiring.
const EXPIRING_WINDOW_DAYS: i64 = 30;

/// Validity of a dated document relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// More than thirty days left.
    Active,
    /// Thirty days or fewer left.
    Expiring,
    /// Past its date, missing, or unreadable.
    Expired,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
        })
    }
}

/// Classify a stored expiry date (`YYYY-MM-DD`, optionally followed by a time).
#[must_use]
pub fn document_status(expiry: Option<&str>, today: NaiveDate) -> DocumentStatus {
    let Some(date) = expiry.and_then(parse_date) else {
        return DocumentStatus::Expired;
    };
    let days_left = (date - today).num_days();
    if days_left < 0 {
        DocumentStatus::Expired
    } else if days_left <= EXPIRING_WINDOW_DAYS {
        DocumentStatus::Expiring
    } else {
        DocumentStatus::Active
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
