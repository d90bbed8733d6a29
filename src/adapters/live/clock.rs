//! System clock.

use chrono::{DateTime, Utc};

use crate::ports::Clock;

/// Reads the host's wall clock; document expiry is judged against its UTC date.
pub struct LiveClock;

impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
