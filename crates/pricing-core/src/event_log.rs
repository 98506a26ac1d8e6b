//! Event log abstraction.
//!
//! The log is an append-only, per-stream ordered store. Its conditional
//! append is the only consistency mechanism in the system: callers never
//! lock, they declare what they expect the stream to look like and let the
//! log reject the write if reality disagrees.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use thiserror::Error;
use uuid::Uuid;

use crate::stream::{StreamKey, StreamPosition};

/// Existence precondition checked atomically with an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedStreamState {
    /// The stream must not contain any events yet.
    MustNotExist,
    /// The stream must already contain at least one event.
    MustExist,
    /// No precondition.
    Any,
}

impl ExpectedStreamState {
    /// Returns whether a stream whose last event is at `current` satisfies
    /// this precondition (`None` means the stream is absent).
    #[must_use]
    pub fn is_satisfied_by(self, current: Option<StreamPosition>) -> bool {
        match self {
            Self::MustNotExist => current.is_none(),
            Self::MustExist => current.is_some(),
            Self::Any => true,
        }
    }
}

/// An event handed to the log for appending.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Unique event identifier (log-level deduplication only).
    pub event_id: Uuid,
    /// Type tag persisted alongside the payload.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Correlation ID of the command that produced the event.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// An event as read back from the log.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Stream this event belongs to.
    pub stream_key: StreamKey,
    /// Type tag for deserialization routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Position within the stream.
    pub position: StreamPosition,
    /// Correlation ID of the command that produced the event.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Errors raised by event log implementations.
#[derive(Debug, Error)]
pub enum EventLogError {
    /// The stream's existence did not match the declared precondition.
    #[error(
        "concurrency conflict on stream {stream_key}: expected {expected:?}, last position {actual:?}"
    )]
    ConcurrencyConflict {
        /// The stream that had the conflict.
        stream_key: StreamKey,
        /// The precondition that was declared.
        expected: ExpectedStreamState,
        /// Position of the stream's last event, `None` if absent.
        actual: Option<StreamPosition>,
    },

    /// The stream has no events.
    #[error("stream not found: {0}")]
    StreamNotFound(StreamKey),

    /// Part of the batch was already appended, part was not.
    #[error("event {0} was already appended in a different batch")]
    DuplicateEvent(Uuid),

    /// An append was attempted with no events.
    #[error("cannot append an empty batch to stream {0}")]
    EmptyAppend(StreamKey),

    /// The log could not be reached or failed internally.
    #[error("event log unavailable: {0}")]
    Unavailable(String),
}

/// Lazy, finite sequence of recorded events in stream order.
pub type RecordedEventStream<'a> = BoxStream<'a, Result<RecordedEvent, EventLogError>>;

/// Append-only event log with conditional appends.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Appends `events` to `stream_key` in order, all or nothing, provided
    /// the stream satisfies `expected` at the time of the write.
    ///
    /// Returns the position of the last appended event. If every event id
    /// in the batch is already present in the stream the call is an
    /// idempotent replay and returns the position of the last of them.
    ///
    /// # Errors
    ///
    /// Returns `EventLogError::ConcurrencyConflict` if the precondition does
    /// not hold, `EventLogError::DuplicateEvent` on a partial replay,
    /// `EventLogError::EmptyAppend` for an empty batch, and
    /// `EventLogError::Unavailable` on transport failure.
    async fn append(
        &self,
        stream_key: &StreamKey,
        expected: ExpectedStreamState,
        events: &[NewEvent],
    ) -> Result<StreamPosition, EventLogError>;

    /// Reads the stream forward starting at `from` (inclusive).
    ///
    /// The returned stream reflects a consistent prefix of the log. Reading
    /// can be resumed by calling again with the position after the last
    /// event seen.
    ///
    /// # Errors
    ///
    /// Returns `EventLogError::StreamNotFound` if the stream has no events
    /// and `EventLogError::Unavailable` on transport failure.
    async fn read_forward<'a>(
        &'a self,
        stream_key: &StreamKey,
        from: StreamPosition,
    ) -> Result<RecordedEventStream<'a>, EventLogError>;
}
