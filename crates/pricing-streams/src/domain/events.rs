//! Domain events for the price history context.
//!
//! The type tags and payload field names are the wire contract of the
//! existing log: payloads are PascalCase JSON objects and prices are JSON
//! numbers carrying every stored digit.

use pricing_core::error::DomainError;
use pricing_core::event::{DomainEvent, EventMetadata};
use pricing_core::event_log::RecordedEvent;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Event type tag for `ProductAddedToShop`.
pub const PRODUCT_ADDED_TO_SHOP_EVENT_TYPE: &str = "productAddedToShop";
/// Event type tag for `ProductPriceChanged`.
pub const PRODUCT_PRICE_CHANGED_EVENT_TYPE: &str = "productPriceChanged";

/// Emitted when a product is enrolled in a shop chain. Opens the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductAddedToShop {
    /// The shop chain the product joined.
    pub shop_chain_id: i64,
    /// The chain-wide baseline price.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub initial_price: Decimal,
}

/// Emitted when a shop of the chain changes the product's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductPriceChanged {
    /// The shop that changed the price.
    pub shop_id: i64,
    /// The new price.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub new_price: Decimal,
}

/// Event payload variants for the price history context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingEventKind {
    /// The product has joined a shop chain.
    ProductAddedToShop(ProductAddedToShop),
    /// A shop has changed the product's price.
    ProductPriceChanged(ProductPriceChanged),
}

/// Domain event envelope for the price history context.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PricingEventKind,
}

fn decode_payload<T: DeserializeOwned>(recorded: &RecordedEvent) -> Result<T, DomainError> {
    serde_json::from_value(recorded.payload.clone()).map_err(|e| DomainError::MalformedEvent {
        stream_key: recorded.stream_key.to_string(),
        position: recorded.position.value(),
        reason: format!("{} payload could not be decoded: {e}", recorded.event_type),
    })
}

impl PricingEvent {
    /// Decodes an event read from the log.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownEventType` if the type tag is not one of
    /// this context's tags, and `DomainError::MalformedEvent` if the payload
    /// does not match the tag.
    pub fn from_recorded(recorded: &RecordedEvent) -> Result<Self, DomainError> {
        let kind = match recorded.event_type.as_str() {
            PRODUCT_ADDED_TO_SHOP_EVENT_TYPE => {
                PricingEventKind::ProductAddedToShop(decode_payload(recorded)?)
            }
            PRODUCT_PRICE_CHANGED_EVENT_TYPE => {
                PricingEventKind::ProductPriceChanged(decode_payload(recorded)?)
            }
            other => {
                return Err(DomainError::UnknownEventType {
                    stream_key: recorded.stream_key.to_string(),
                    event_type: other.to_owned(),
                });
            }
        };

        Ok(Self {
            metadata: EventMetadata {
                event_id: recorded.event_id,
                event_type: recorded.event_type.clone(),
                stream_key: recorded.stream_key.clone(),
                correlation_id: recorded.correlation_id,
                occurred_at: recorded.occurred_at,
                position: Some(recorded.position),
            },
            kind,
        })
    }
}

impl DomainEvent for PricingEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            PricingEventKind::ProductAddedToShop(_) => PRODUCT_ADDED_TO_SHOP_EVENT_TYPE,
            PricingEventKind::ProductPriceChanged(_) => PRODUCT_PRICE_CHANGED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> Result<serde_json::Value, DomainError> {
        let payload = match &self.kind {
            PricingEventKind::ProductAddedToShop(added) => serde_json::to_value(added),
            PricingEventKind::ProductPriceChanged(changed) => serde_json::to_value(changed),
        };
        payload.map_err(|e| DomainError::Infrastructure(format!("event serialization failed: {e}")))
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
