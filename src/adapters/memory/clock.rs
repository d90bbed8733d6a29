//! Clock pinned to a single instant.

use chrono::{DateTime, Utc};

use crate::ports::Clock;

/// Always answers the same time.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
