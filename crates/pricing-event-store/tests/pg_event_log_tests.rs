//! Integration tests for `PgEventLog`.
//!
//! These need a running PostgreSQL reachable through `DATABASE_URL`:
//! `cargo test -p pricing-event-store -- --ignored`.

use chrono::{TimeZone, Utc};
use futures::TryStreamExt;
use pricing_core::event_log::{
    EventLog, EventLogError, ExpectedStreamState, NewEvent, RecordedEvent,
};
use pricing_core::stream::{StreamKey, StreamPosition};
use pricing_event_store::PgEventLog;
use sqlx::PgPool;
use uuid::Uuid;

/// Helper to build a `NewEvent` with sensible defaults.
fn make_new_event(event_type: &str) -> NewEvent {
    NewEvent {
        event_id: Uuid::new_v4(),
        event_type: event_type.to_owned(),
        payload: serde_json::json!({"ShopChainId": 3, "InitialPrice": 9.99}),
        correlation_id: Uuid::new_v4(),
        occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    }
}

async fn read_all(log: &PgEventLog, key: &StreamKey) -> Vec<RecordedEvent> {
    log.read_forward(key, StreamPosition::START)
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap()
}

// --- read_forward ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_read_forward_reports_missing_stream(pool: PgPool) {
    let log = PgEventLog::new(pool);

    let result = log
        .read_forward(&StreamKey::new("7-99"), StreamPosition::START)
        .await;

    assert!(matches!(result, Err(EventLogError::StreamNotFound(_))));
}

// --- append + read_forward round-trip ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_append_and_read_single_event(pool: PgPool) {
    let log = PgEventLog::new(pool);
    let key = StreamKey::new("7-3");
    let event = make_new_event("productAddedToShop");
    let expected = event.clone();

    let position = log
        .append(&key, ExpectedStreamState::MustNotExist, &[event])
        .await
        .unwrap();

    assert_eq!(position, StreamPosition::START);
    let loaded = read_all(&log, &key).await;
    assert_eq!(loaded.len(), 1);
    let e = &loaded[0];
    assert_eq!(e.event_id, expected.event_id);
    assert_eq!(e.stream_key, key);
    assert_eq!(e.event_type, expected.event_type);
    assert_eq!(e.payload, expected.payload);
    assert_eq!(e.correlation_id, expected.correlation_id);
    assert_eq!(e.occurred_at, expected.occurred_at);
}

// --- preconditions ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_must_not_exist_conflicts_on_existing_stream(pool: PgPool) {
    let log = PgEventLog::new(pool);
    let key = StreamKey::new("7-3");
    log.append(&key, ExpectedStreamState::MustNotExist, &[make_new_event("a")])
        .await
        .unwrap();

    let result = log
        .append(&key, ExpectedStreamState::MustNotExist, &[make_new_event("b")])
        .await;

    match result {
        Err(EventLogError::ConcurrencyConflict { actual, .. }) => {
            assert_eq!(actual, Some(StreamPosition::START));
        }
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_must_exist_appends_after_last_position(pool: PgPool) {
    let log = PgEventLog::new(pool);
    let key = StreamKey::new("7-3");
    log.append(&key, ExpectedStreamState::MustNotExist, &[make_new_event("a")])
        .await
        .unwrap();

    let position = log
        .append(
            &key,
            ExpectedStreamState::MustExist,
            &[make_new_event("b"), make_new_event("c")],
        )
        .await
        .unwrap();

    assert_eq!(position, StreamPosition::new(2));
    let loaded = read_all(&log, &key).await;
    let positions: Vec<u64> = loaded.iter().map(|e| e.position.value()).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_must_exist_conflicts_on_absent_stream(pool: PgPool) {
    let log = PgEventLog::new(pool);

    let result = log
        .append(
            &StreamKey::new("7-99"),
            ExpectedStreamState::MustExist,
            &[make_new_event("a")],
        )
        .await;

    match result {
        Err(EventLogError::ConcurrencyConflict { actual, .. }) => assert_eq!(actual, None),
        other => panic!("expected ConcurrencyConflict, got {other:?}"),
    }
}

// --- deduplication ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_replayed_batch_is_idempotent(pool: PgPool) {
    let log = PgEventLog::new(pool);
    let key = StreamKey::new("7-3");
    let event = make_new_event("a");
    log.append(&key, ExpectedStreamState::MustNotExist, std::slice::from_ref(&event))
        .await
        .unwrap();

    let position = log
        .append(&key, ExpectedStreamState::MustNotExist, &[event])
        .await
        .unwrap();

    assert_eq!(position, StreamPosition::START);
    assert_eq!(read_all(&log, &key).await.len(), 1);
}

// --- concurrency ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_creates_admit_exactly_one_writer(pool: PgPool) {
    let log = PgEventLog::new(pool);
    let key = StreamKey::new("7-3");

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let log = log.clone();
            let key = key.clone();
            tokio::spawn(async move {
                log.append(&key, ExpectedStreamState::MustNotExist, &[make_new_event("a")])
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(EventLogError::ConcurrencyConflict { .. }) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(read_all(&log, &key).await.len(), 1);
}

// --- payload precision ---

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_decimal_payload_keeps_its_digits(pool: PgPool) {
    let log = PgEventLog::new(pool);
    let key = StreamKey::new("7-3");
    let mut event = make_new_event("productPriceChanged");
    event.payload = serde_json::from_str(r#"{"ShopId":1,"NewPrice":8.4900000000000000001}"#).unwrap();

    log.append(&key, ExpectedStreamState::Any, &[event])
        .await
        .unwrap();

    let loaded = read_all(&log, &key).await;
    assert_eq!(loaded[0].payload["NewPrice"].to_string(), "8.4900000000000000001");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_payload_is_stored_verbatim(pool: PgPool) {
    let log = PgEventLog::new(pool.clone());
    let key = StreamKey::new("7-3");
    let mut event = make_new_event("productAddedToShop");
    event.payload = serde_json::from_str(r#"{"ShopChainId":3,"InitialPrice":9.99}"#).unwrap();

    log.append(&key, ExpectedStreamState::MustNotExist, &[event])
        .await
        .unwrap();

    let stored: String =
        sqlx::query_scalar("SELECT payload::text FROM stream_events WHERE stream_key = $1")
            .bind(key.as_str())
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored, r#"{"ShopChainId":3,"InitialPrice":9.99}"#);
    let loaded = read_all(&log, &key).await;
    assert_eq!(
        serde_json::to_string(&loaded[0].payload).unwrap(),
        r#"{"ShopChainId":3,"InitialPrice":9.99}"#
    );
}
