//! Stream key derivation.
//!
//! The key format `"{product_id}-{shop_chain_id}"` is how existing streams
//! are addressed in the log. Changing it orphans every stored history.

use pricing_core::stream::StreamKey;

/// Derives the stream key for a product's membership in a shop chain.
///
/// Decimal renderings of integers contain no `-` other than an optional
/// leading sign, so the first `-` after the product's digits is always the
/// separator and distinct pairs never produce the same key.
#[must_use]
pub fn derive_stream_key(product_id: i64, shop_chain_id: i64) -> StreamKey {
    StreamKey::new(format!("{product_id}-{shop_chain_id}"))
}
