//! In-memory implementation of the `EventLog` trait.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use tracing::debug;

use pricing_core::event_log::{
    EventLog, EventLogError, ExpectedStreamState, NewEvent, RecordedEvent, RecordedEventStream,
};
use pricing_core::stream::{StreamKey, StreamPosition};

/// Thread-safe, process-local event log.
///
/// The precondition check and the write happen under one write guard with
/// no await point in between, so an append is either fully applied or not
/// started, even if the calling future is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    streams: Arc<RwLock<HashMap<StreamKey, Vec<RecordedEvent>>>>,
}

impl InMemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> EventLogError {
    EventLogError::Unavailable("in-memory event log lock poisoned".into())
}

/// Detects a replay of a batch that was already appended.
///
/// Returns `Ok(Some(position))` when every event id is present, `Ok(None)`
/// when none is.
fn detect_replay(
    existing: &[RecordedEvent],
    events: &[NewEvent],
) -> Result<Option<StreamPosition>, EventLogError> {
    let replayed: Vec<&RecordedEvent> = events
        .iter()
        .filter_map(|new| existing.iter().find(|r| r.event_id == new.event_id))
        .collect();

    if replayed.is_empty() {
        return Ok(None);
    }
    if replayed.len() < events.len() {
        return Err(EventLogError::DuplicateEvent(replayed[0].event_id));
    }
    Ok(replayed.iter().map(|r| r.position).max())
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(
        &self,
        stream_key: &StreamKey,
        expected: ExpectedStreamState,
        events: &[NewEvent],
    ) -> Result<StreamPosition, EventLogError> {
        if events.is_empty() {
            return Err(EventLogError::EmptyAppend(stream_key.clone()));
        }

        let mut streams = self.streams.write().map_err(poisoned)?;

        let existing = streams.get(stream_key).map_or(&[][..], Vec::as_slice);
        if let Some(position) = detect_replay(existing, events)? {
            debug!(%stream_key, %position, "ignoring replayed append");
            return Ok(position);
        }

        let current = existing.last().map(|e| e.position);
        if !expected.is_satisfied_by(current) {
            return Err(EventLogError::ConcurrencyConflict {
                stream_key: stream_key.clone(),
                expected,
                actual: current,
            });
        }

        let stream = streams.entry(stream_key.clone()).or_default();
        let mut position = current.map_or(StreamPosition::START, StreamPosition::next);
        let mut last = position;
        for event in events {
            stream.push(RecordedEvent {
                event_id: event.event_id,
                stream_key: stream_key.clone(),
                event_type: event.event_type.clone(),
                payload: event.payload.clone(),
                position,
                correlation_id: event.correlation_id,
                occurred_at: event.occurred_at,
            });
            last = position;
            position = position.next();
        }

        Ok(last)
    }

    async fn read_forward<'a>(
        &'a self,
        stream_key: &StreamKey,
        from: StreamPosition,
    ) -> Result<RecordedEventStream<'a>, EventLogError> {
        let streams = self.streams.read().map_err(poisoned)?;
        let Some(events) = streams.get(stream_key) else {
            return Err(EventLogError::StreamNotFound(stream_key.clone()));
        };

        // Copy the prefix out so readers never observe a half-applied append.
        let snapshot: Vec<RecordedEvent> = events
            .iter()
            .filter(|e| e.position >= from)
            .cloned()
            .collect();

        Ok(stream::iter(snapshot.into_iter().map(Ok)).boxed())
    }
}
