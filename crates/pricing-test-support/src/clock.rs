//! Test clocks: deterministic `Clock` implementations for tests.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use pricing_core::clock::Clock;

/// A clock that always returns a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock that starts at a given instant and moves forward by `step` after
/// every reading. Lets a test give each appended event its own calendar day.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    /// Create a clock whose first reading is `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// Create a clock that advances one day per reading.
    #[must_use]
    pub fn daily(start: DateTime<Utc>) -> Self {
        Self::new(start, Duration::days(1))
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap();
        let now = *next;
        *next = now + self.step;
        now
    }
}
