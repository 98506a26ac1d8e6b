//! Clock abstraction for determinism.
//!
//! Every event is stamped with the time the command was handled. Calendar
//! dates shown in price histories are derived from those stamps in UTC, so
//! a replay on any host yields the same dates.

use chrono::{DateTime, NaiveDate, Utc};

/// Abstraction over system time for deterministic behavior.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Calendar date (UTC) on which an event occurred.
#[must_use]
pub fn calendar_date(occurred_at: DateTime<Utc>) -> NaiveDate {
    occurred_at.date_naive()
}
