//! `PostgreSQL` implementation of the `EventLog` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use pricing_core::event_log::{
    EventLog, EventLogError, ExpectedStreamState, NewEvent, RecordedEvent, RecordedEventStream,
};
use pricing_core::stream::{StreamKey, StreamPosition};

/// Name of the unique constraint guarding per-stream positions.
const POSITION_CONSTRAINT: &str = "stream_events_stream_key_position_key";

/// PostgreSQL-backed event log.
///
/// Appends for one stream are serialized by a transaction-scoped advisory
/// lock keyed on the stream; the unique `(stream_key, position)` constraint
/// backs that up. Dropping an in-flight append rolls its transaction back.
#[derive(Debug, Clone)]
pub struct PgEventLog {
    pool: PgPool,
}

impl PgEventLog {
    /// Creates a new `PgEventLog`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    event_id: Uuid,
    event_type: String,
    payload: String,
    position: i64,
    correlation_id: Uuid,
    occurred_at: DateTime<Utc>,
}

impl EventRow {
    fn into_recorded(self, stream_key: &StreamKey) -> Result<RecordedEvent, EventLogError> {
        let payload = serde_json::from_str(&self.payload).map_err(|e| {
            EventLogError::Unavailable(format!(
                "stored payload of {} is not JSON: {e}",
                self.event_id
            ))
        })?;
        Ok(RecordedEvent {
            event_id: self.event_id,
            stream_key: stream_key.clone(),
            event_type: self.event_type,
            payload,
            position: to_position(self.position)?,
            correlation_id: self.correlation_id,
            occurred_at: self.occurred_at,
        })
    }
}

fn unavailable(err: sqlx::Error) -> EventLogError {
    EventLogError::Unavailable(err.to_string())
}

fn to_position(raw: i64) -> Result<StreamPosition, EventLogError> {
    u64::try_from(raw)
        .map(StreamPosition::new)
        .map_err(|_| EventLogError::Unavailable(format!("negative stream position {raw}")))
}

/// Payloads travel as text cast to `json`, so the column stores exactly the
/// serialized bytes instead of a re-encoded binary form.
fn payload_text(event: &NewEvent) -> Result<String, EventLogError> {
    serde_json::to_string(&event.payload).map_err(|e| {
        EventLogError::Unavailable(format!("payload of {} cannot be encoded: {e}", event.event_id))
    })
}

fn to_column(position: StreamPosition) -> Result<i64, EventLogError> {
    i64::try_from(position.value()).map_err(|_| {
        EventLogError::Unavailable(format!("stream position {position} exceeds column range"))
    })
}

/// Looks for event ids of `events` that are already stored.
///
/// Returns the last position when the whole batch was stored before in
/// this stream, `None` when none of it was.
async fn detect_replay(
    tx: &mut Transaction<'_, Postgres>,
    stream_key: &StreamKey,
    events: &[NewEvent],
) -> Result<Option<StreamPosition>, EventLogError> {
    let event_ids: Vec<Uuid> = events.iter().map(|e| e.event_id).collect();
    let stored: Vec<(Uuid, String, i64)> = sqlx::query_as(
        "SELECT event_id, stream_key, position FROM stream_events \
         WHERE event_id = ANY($1) ORDER BY position",
    )
    .bind(&event_ids)
    .fetch_all(&mut **tx)
    .await
    .map_err(unavailable)?;

    let Some((first_id, _, _)) = stored.first() else {
        return Ok(None);
    };
    let all_in_stream = stored.iter().all(|(_, key, _)| key == stream_key.as_str());
    if stored.len() < events.len() || !all_in_stream {
        return Err(EventLogError::DuplicateEvent(*first_id));
    }
    match stored.last() {
        Some((_, _, position)) => Ok(Some(to_position(*position)?)),
        None => Ok(None),
    }
}

fn map_insert_error(
    err: sqlx::Error,
    stream_key: &StreamKey,
    expected: ExpectedStreamState,
    current: Option<StreamPosition>,
    event_id: Uuid,
) -> EventLogError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            if db_err.constraint() == Some(POSITION_CONSTRAINT) {
                return EventLogError::ConcurrencyConflict {
                    stream_key: stream_key.clone(),
                    expected,
                    actual: current,
                };
            }
            return EventLogError::DuplicateEvent(event_id);
        }
    }
    unavailable(err)
}

#[async_trait]
impl EventLog for PgEventLog {
    async fn append(
        &self,
        stream_key: &StreamKey,
        expected: ExpectedStreamState,
        events: &[NewEvent],
    ) -> Result<StreamPosition, EventLogError> {
        if events.is_empty() {
            return Err(EventLogError::EmptyAppend(stream_key.clone()));
        }

        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(stream_key.as_str())
            .execute(&mut *tx)
            .await
            .map_err(unavailable)?;

        if let Some(position) = detect_replay(&mut tx, stream_key, events).await? {
            debug!(%stream_key, %position, "ignoring replayed append");
            tx.rollback().await.map_err(unavailable)?;
            return Ok(position);
        }

        let current: Option<i64> =
            sqlx::query_scalar("SELECT MAX(position) FROM stream_events WHERE stream_key = $1")
                .bind(stream_key.as_str())
                .fetch_one(&mut *tx)
                .await
                .map_err(unavailable)?;
        let current = current.map(to_position).transpose()?;

        if !expected.is_satisfied_by(current) {
            return Err(EventLogError::ConcurrencyConflict {
                stream_key: stream_key.clone(),
                expected,
                actual: current,
            });
        }

        let mut position = current.map_or(StreamPosition::START, StreamPosition::next);
        let mut last = position;
        for event in events {
            sqlx::query(
                "INSERT INTO stream_events \
                 (event_id, stream_key, position, event_type, payload, correlation_id, occurred_at) \
                 VALUES ($1, $2, $3, $4, $5::json, $6, $7)",
            )
            .bind(event.event_id)
            .bind(stream_key.as_str())
            .bind(to_column(position)?)
            .bind(&event.event_type)
            .bind(payload_text(event)?)
            .bind(event.correlation_id)
            .bind(event.occurred_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, stream_key, expected, current, event.event_id))?;
            last = position;
            position = position.next();
        }

        tx.commit().await.map_err(unavailable)?;
        Ok(last)
    }

    async fn read_forward<'a>(
        &'a self,
        stream_key: &StreamKey,
        from: StreamPosition,
    ) -> Result<RecordedEventStream<'a>, EventLogError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM stream_events WHERE stream_key = $1)",
        )
        .bind(stream_key.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable)?;
        if !exists {
            return Err(EventLogError::StreamNotFound(stream_key.clone()));
        }

        // A single statement reads from one snapshot, so the rows form a
        // consistent prefix even while appends are in flight.
        let key = stream_key.clone();
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT event_id, event_type, payload::text AS payload, position, correlation_id, occurred_at \
             FROM stream_events WHERE stream_key = $1 AND position >= $2 ORDER BY position",
        )
        .bind(stream_key.as_str().to_owned())
        .bind(to_column(from)?)
        .fetch(&self.pool)
        .map(move |row| -> Result<RecordedEvent, EventLogError> {
            row.map_err(unavailable)?.into_recorded(&key)
        });

        Ok(rows.boxed())
    }
}
