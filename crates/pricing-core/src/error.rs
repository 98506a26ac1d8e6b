//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every variant is a distinct, documented outcome. Precondition violations
/// and missing history are expected business results; only
/// `Infrastructure` is worth retrying, and retrying is left to the caller.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The product already has an enrollment event for this chain.
    #[error("product {product_id} is already enrolled in shop chain {shop_chain_id}")]
    AlreadyEnrolled {
        /// The product identifier.
        product_id: i64,
        /// The shop chain identifier.
        shop_chain_id: i64,
    },

    /// A price change was attempted before the product joined the chain.
    #[error("product {product_id} is not enrolled in shop chain {shop_chain_id}")]
    NotEnrolled {
        /// The product identifier.
        product_id: i64,
        /// The shop chain identifier.
        shop_chain_id: i64,
    },

    /// No pricing stream exists for the product/chain pair.
    #[error("no price history for product {product_id} in shop chain {shop_chain_id}")]
    NoHistory {
        /// The product identifier.
        product_id: i64,
        /// The shop chain identifier.
        shop_chain_id: i64,
    },

    /// The catalog has no product with this identifier.
    #[error("product not found: {0}")]
    ProductNotFound(i64),

    /// A stored event carries a type tag this service does not know.
    #[error("unknown event type {event_type:?} in stream {stream_key}")]
    UnknownEventType {
        /// The stream the event was read from.
        stream_key: String,
        /// The unrecognized type tag.
        event_type: String,
    },

    /// A stored event could not be decoded or breaks the stream's shape.
    #[error("malformed event at position {position} in stream {stream_key}: {reason}")]
    MalformedEvent {
        /// The stream the event was read from.
        stream_key: String,
        /// Position of the offending event.
        position: u64,
        /// What was wrong with it.
        reason: String,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
