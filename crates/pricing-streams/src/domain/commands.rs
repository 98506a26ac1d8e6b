//! Commands for the price history context.

use pricing_core::command::Command;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Command to enroll a product in a shop chain at a baseline price.
#[derive(Debug, Clone)]
pub struct EnrollProductInChain {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The product identifier.
    pub product_id: i64,
    /// The shop chain identifier.
    pub shop_chain_id: i64,
    /// The chain-wide baseline price.
    pub initial_price: Decimal,
}

/// Command to record a price change at one shop of a chain.
#[derive(Debug, Clone)]
pub struct RecordPriceChange {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The product identifier.
    pub product_id: i64,
    /// The shop chain identifier.
    pub shop_chain_id: i64,
    /// The shop that changed the price.
    pub shop_id: i64,
    /// The new price.
    pub new_price: Decimal,
}

impl Command for EnrollProductInChain {
    fn command_type(&self) -> &'static str {
        "pricing.enroll_product_in_chain"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for RecordPriceChange {
    fn command_type(&self) -> &'static str {
        "pricing.record_price_change"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
