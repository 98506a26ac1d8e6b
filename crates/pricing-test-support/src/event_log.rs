//! Test event logs: mock `EventLog` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;
use futures::{future, stream};
use pricing_core::event_log::{
    EventLog, EventLogError, ExpectedStreamState, NewEvent, RecordedEvent, RecordedEventStream,
};
use pricing_core::stream::{StreamKey, StreamPosition};

fn last_position_of(batch: &[NewEvent]) -> StreamPosition {
    let len = u64::try_from(batch.len()).unwrap_or(1);
    StreamPosition::new(len.saturating_sub(1))
}

/// An event log that records every `append` call and always accepts it.
/// `read_forward` returns the configured events on every call, or
/// `StreamNotFound` when none were configured.
#[derive(Debug, Default)]
pub struct RecordingEventLog {
    read_result: Vec<RecordedEvent>,
    appended: Mutex<Vec<(StreamKey, ExpectedStreamState, Vec<NewEvent>)>>,
}

impl RecordingEventLog {
    /// Create a recording log with nothing to read.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recording log that serves `events` from every read.
    #[must_use]
    pub fn with_events(events: Vec<RecordedEvent>) -> Self {
        Self {
            read_result: events,
            appended: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every append call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn appended_events(&self) -> Vec<(StreamKey, ExpectedStreamState, Vec<NewEvent>)> {
        self.appended.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventLog for RecordingEventLog {
    async fn append(
        &self,
        stream_key: &StreamKey,
        expected: ExpectedStreamState,
        events: &[NewEvent],
    ) -> Result<StreamPosition, EventLogError> {
        self.appended
            .lock()
            .unwrap()
            .push((stream_key.clone(), expected, events.to_vec()));
        Ok(last_position_of(events))
    }

    async fn read_forward<'a>(
        &'a self,
        stream_key: &StreamKey,
        from: StreamPosition,
    ) -> Result<RecordedEventStream<'a>, EventLogError> {
        if self.read_result.is_empty() {
            return Err(EventLogError::StreamNotFound(stream_key.clone()));
        }
        let events: Vec<_> = self
            .read_result
            .iter()
            .filter(|e| e.position >= from)
            .cloned()
            .map(Ok)
            .collect();
        Ok(stream::iter(events).boxed())
    }
}

/// An event log with no streams. Reads report `StreamNotFound`; appends
/// succeed unless they require the stream to exist.
#[derive(Debug)]
pub struct EmptyEventLog;

#[async_trait]
impl EventLog for EmptyEventLog {
    async fn append(
        &self,
        stream_key: &StreamKey,
        expected: ExpectedStreamState,
        events: &[NewEvent],
    ) -> Result<StreamPosition, EventLogError> {
        if !expected.is_satisfied_by(None) {
            return Err(EventLogError::ConcurrencyConflict {
                stream_key: stream_key.clone(),
                expected,
                actual: None,
            });
        }
        Ok(last_position_of(events))
    }

    async fn read_forward<'a>(
        &'a self,
        stream_key: &StreamKey,
        _from: StreamPosition,
    ) -> Result<RecordedEventStream<'a>, EventLogError> {
        Err(EventLogError::StreamNotFound(stream_key.clone()))
    }
}

/// An event log that rejects every append's precondition, as if another
/// writer always got there first.
#[derive(Debug)]
pub struct ConflictingEventLog;

#[async_trait]
impl EventLog for ConflictingEventLog {
    async fn append(
        &self,
        stream_key: &StreamKey,
        expected: ExpectedStreamState,
        _events: &[NewEvent],
    ) -> Result<StreamPosition, EventLogError> {
        let actual = match expected {
            ExpectedStreamState::MustExist => None,
            ExpectedStreamState::MustNotExist | ExpectedStreamState::Any => {
                Some(StreamPosition::START)
            }
        };
        Err(EventLogError::ConcurrencyConflict {
            stream_key: stream_key.clone(),
            expected,
            actual,
        })
    }

    async fn read_forward<'a>(
        &'a self,
        stream_key: &StreamKey,
        _from: StreamPosition,
    ) -> Result<RecordedEventStream<'a>, EventLogError> {
        Err(EventLogError::StreamNotFound(stream_key.clone()))
    }
}

/// An event log that is always unavailable. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingEventLog;

#[async_trait]
impl EventLog for FailingEventLog {
    async fn append(
        &self,
        _stream_key: &StreamKey,
        _expected: ExpectedStreamState,
        _events: &[NewEvent],
    ) -> Result<StreamPosition, EventLogError> {
        Err(EventLogError::Unavailable("connection refused".into()))
    }

    async fn read_forward<'a>(
        &'a self,
        _stream_key: &StreamKey,
        _from: StreamPosition,
    ) -> Result<RecordedEventStream<'a>, EventLogError> {
        Err(EventLogError::Unavailable("connection refused".into()))
    }
}

/// An event log whose calls never complete, standing in for a stalled
/// backend.
#[derive(Debug)]
pub struct StalledEventLog;

#[async_trait]
impl EventLog for StalledEventLog {
    async fn append(
        &self,
        _stream_key: &StreamKey,
        _expected: ExpectedStreamState,
        _events: &[NewEvent],
    ) -> Result<StreamPosition, EventLogError> {
        future::pending().await
    }

    async fn read_forward<'a>(
        &'a self,
        _stream_key: &StreamKey,
        _from: StreamPosition,
    ) -> Result<RecordedEventStream<'a>, EventLogError> {
        future::pending().await
    }
}
