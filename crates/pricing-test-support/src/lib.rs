//! Shared test doubles for the product price history service.

mod clock;
mod event_log;
mod ids;

pub use clock::{FixedClock, SteppingClock};
pub use event_log::{
    ConflictingEventLog, EmptyEventLog, FailingEventLog, RecordingEventLog, StalledEventLog,
};
pub use ids::SequenceIds;
