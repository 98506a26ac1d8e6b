//! Command handlers for the price history context.
//!
//! Handlers never load the stream before writing. The precondition passed
//! to the log (`MustNotExist` for enrollment, `MustExist` for price changes)
//! is the whole consistency check, and a rejected precondition is a business
//! outcome that is reported, never retried.

use pricing_core::clock::Clock;
use pricing_core::command::Command;
use pricing_core::error::DomainError;
use pricing_core::event::{DomainEvent, EventMetadata};
use pricing_core::event_log::{EventLog, EventLogError, ExpectedStreamState};
use pricing_core::stream::{StreamKey, StreamPosition};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::commands::{EnrollProductInChain, RecordPriceChange};
use crate::domain::events::{
    PricingEvent, PricingEventKind, ProductAddedToShop, ProductPriceChanged,
};
use crate::domain::stream_key::derive_stream_key;

/// Result of a successfully handled command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingCommandResult {
    /// The stream the events were appended to.
    pub stream_key: StreamKey,
    /// Position of the last appended event.
    pub stream_position: StreamPosition,
    /// IDs of the appended events.
    pub event_ids: Vec<Uuid>,
    /// Correlation ID stored with the events.
    pub correlation_id: Uuid,
}

fn ensure_not_negative(price: Decimal, field: &str) -> Result<(), DomainError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::Validation(format!(
            "{field} must not be negative, got {price}"
        )));
    }
    Ok(())
}

fn build_event(
    stream_key: &StreamKey,
    command: &dyn Command,
    clock: &dyn Clock,
    kind: PricingEventKind,
) -> PricingEvent {
    // TODO: event_id uses Uuid::new_v4(); a caller-supplied idempotency key
    // would let clients retry a timed-out command through the log's replay
    // detection.
    let mut event = PricingEvent {
        metadata: EventMetadata {
            event_id: Uuid::new_v4(),
            event_type: String::new(),
            stream_key: stream_key.clone(),
            correlation_id: command.correlation_id(),
            occurred_at: clock.now(),
            position: None,
        },
        kind,
    };
    event.metadata.event_type = event.event_type().to_owned();
    event
}

/// Appends a single event under `expected`, translating a rejected
/// precondition through `on_conflict`.
async fn append_one(
    log: &dyn EventLog,
    expected: ExpectedStreamState,
    event: &PricingEvent,
    on_conflict: DomainError,
) -> Result<PricingCommandResult, DomainError> {
    let stream_key = &event.metadata.stream_key;
    let new_event = event.to_new_event()?;

    match log.append(stream_key, expected, &[new_event]).await {
        Ok(stream_position) => {
            info!(%stream_key, %stream_position, event_type = event.event_type(), "event appended");
            Ok(PricingCommandResult {
                stream_key: stream_key.clone(),
                stream_position,
                event_ids: vec![event.metadata.event_id],
                correlation_id: event.metadata.correlation_id,
            })
        }
        Err(EventLogError::ConcurrencyConflict { actual, .. }) => {
            warn!(%stream_key, ?expected, ?actual, "append precondition rejected");
            Err(on_conflict)
        }
        Err(other) => Err(DomainError::Infrastructure(other.to_string())),
    }
}

/// Handles `EnrollProductInChain`: opens the product/chain stream with a
/// `ProductAddedToShop` event.
///
/// # Errors
///
/// Returns `DomainError::AlreadyEnrolled` if the stream already exists,
/// `DomainError::Validation` for a negative price, and
/// `DomainError::Infrastructure` if the log fails.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        product_id = command.product_id,
        shop_chain_id = command.shop_chain_id,
        correlation_id = %command.correlation_id,
    )
)]
pub async fn handle_enroll_product_in_chain(
    command: &EnrollProductInChain,
    clock: &dyn Clock,
    log: &dyn EventLog,
) -> Result<PricingCommandResult, DomainError> {
    ensure_not_negative(command.initial_price, "initial price")?;

    let stream_key = derive_stream_key(command.product_id, command.shop_chain_id);
    let event = build_event(
        &stream_key,
        command,
        clock,
        PricingEventKind::ProductAddedToShop(ProductAddedToShop {
            shop_chain_id: command.shop_chain_id,
            initial_price: command.initial_price,
        }),
    );

    append_one(
        log,
        ExpectedStreamState::MustNotExist,
        &event,
        DomainError::AlreadyEnrolled {
            product_id: command.product_id,
            shop_chain_id: command.shop_chain_id,
        },
    )
    .await
}

/// Handles `RecordPriceChange`: extends an existing product/chain stream
/// with a `ProductPriceChanged` event.
///
/// # Errors
///
/// Returns `DomainError::NotEnrolled` if the stream does not exist yet,
/// `DomainError::Validation` for a negative price, and
/// `DomainError::Infrastructure` if the log fails.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        product_id = command.product_id,
        shop_chain_id = command.shop_chain_id,
        shop_id = command.shop_id,
        correlation_id = %command.correlation_id,
    )
)]
pub async fn handle_record_price_change(
    command: &RecordPriceChange,
    clock: &dyn Clock,
    log: &dyn EventLog,
) -> Result<PricingCommandResult, DomainError> {
    ensure_not_negative(command.new_price, "new price")?;

    let stream_key = derive_stream_key(command.product_id, command.shop_chain_id);
    let event = build_event(
        &stream_key,
        command,
        clock,
        PricingEventKind::ProductPriceChanged(ProductPriceChanged {
            shop_id: command.shop_id,
            new_price: command.new_price,
        }),
    );

    append_one(
        log,
        ExpectedStreamState::MustExist,
        &event,
        DomainError::NotEnrolled {
            product_id: command.product_id,
            shop_chain_id: command.shop_chain_id,
        },
    )
    .await
}
