//! Query handlers for the price history context.
//!
//! Histories are rebuilt on every read: the stream is read from its first
//! event, decoded, folded, and joined with the catalog record if one exists.

use futures::TryStreamExt;
use pricing_core::catalog::ProductCatalog;
use pricing_core::error::DomainError;
use pricing_core::event_log::{EventLog, EventLogError, RecordedEvent};
use pricing_core::stream::StreamPosition;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::events::{PricingEvent, PricingEventKind};
use crate::domain::history::{self, PriceEntry};
use crate::domain::stream_key::derive_stream_key;

/// Read-only view of one product's price history within one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceHistoryView {
    /// The product identifier.
    pub product_id: i64,
    /// The shop chain identifier.
    pub shop_chain_id: i64,
    /// Catalog name, `None` when the catalog has no record.
    pub name: Option<String>,
    /// Catalog category, `None` when the catalog has no record.
    pub category: Option<String>,
    /// Price entries in log order.
    pub prices: Vec<PriceEntry>,
    /// Number of events folded.
    pub version: u64,
}

/// Retrieves the price history of a product in a shop chain.
///
/// # Errors
///
/// Returns `DomainError::NoHistory` if the stream has no events,
/// `DomainError::UnknownEventType` or `DomainError::MalformedEvent` if a
/// stored event cannot be interpreted, and `DomainError::Infrastructure` if
/// the log or the catalog fails.
#[instrument(skip(log, catalog))]
pub async fn get_price_history(
    product_id: i64,
    shop_chain_id: i64,
    log: &dyn EventLog,
    catalog: &dyn ProductCatalog,
) -> Result<PriceHistoryView, DomainError> {
    let stream_key = derive_stream_key(product_id, shop_chain_id);
    let map_log_error = |err: EventLogError| match err {
        EventLogError::StreamNotFound(_) => DomainError::NoHistory {
            product_id,
            shop_chain_id,
        },
        other => DomainError::Infrastructure(other.to_string()),
    };

    let recorded: Vec<RecordedEvent> = log
        .read_forward(&stream_key, StreamPosition::START)
        .await
        .map_err(map_log_error)?
        .try_collect()
        .await
        .map_err(map_log_error)?;
    if recorded.is_empty() {
        return Err(map_log_error(EventLogError::StreamNotFound(stream_key)));
    }

    let events = recorded
        .iter()
        .map(PricingEvent::from_recorded)
        .collect::<Result<Vec<_>, _>>()?;
    let history = history::fold(&events)?;

    if history.shop_chain_id != Some(shop_chain_id) {
        let enrollment_position = events
            .iter()
            .find(|event| matches!(event.kind, PricingEventKind::ProductAddedToShop(_)))
            .and_then(|event| event.metadata.position)
            .unwrap_or(StreamPosition::START);
        return Err(DomainError::MalformedEvent {
            stream_key: stream_key.to_string(),
            position: enrollment_position.value(),
            reason: format!(
                "enrollment names shop chain {:?}, stream belongs to {shop_chain_id}",
                history.shop_chain_id
            ),
        });
    }

    let product = catalog.get_product(product_id).await?;
    if product.is_none() {
        debug!(product_id, "no catalog record for product with price history");
    }
    let (name, category) = product.map_or((None, None), |p| (Some(p.name), Some(p.category)));

    Ok(PriceHistoryView {
        product_id,
        shop_chain_id,
        name,
        category,
        prices: history.prices,
        version: history.version,
    })
}
