//! Service facade for the price history context.

use std::sync::Arc;

use pricing_core::catalog::ProductCatalog;
use pricing_core::clock::Clock;
use pricing_core::error::DomainError;
use pricing_core::event_log::EventLog;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::command_handlers::{
    PricingCommandResult, handle_enroll_product_in_chain, handle_record_price_change,
};
use crate::application::query_handlers::{self, PriceHistoryView};
use crate::domain::commands::{EnrollProductInChain, RecordPriceChange};

/// Entry point for enrolling products, recording price changes, and reading
/// price histories. Cheap to clone; every clone shares the same log.
#[derive(Clone)]
pub struct PricingStreamService {
    log: Arc<dyn EventLog>,
    catalog: Arc<dyn ProductCatalog>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PricingStreamService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingStreamService").finish_non_exhaustive()
    }
}

impl PricingStreamService {
    /// Creates a service over the given log, catalog, and clock.
    #[must_use]
    pub fn new(
        log: Arc<dyn EventLog>,
        catalog: Arc<dyn ProductCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            log,
            catalog,
            clock,
        }
    }

    /// Enrolls `product_id` in `shop_chain_id` at `initial_price`.
    ///
    /// # Errors
    ///
    /// See [`handle_enroll_product_in_chain`].
    pub async fn enroll_product_in_chain(
        &self,
        product_id: i64,
        shop_chain_id: i64,
        initial_price: Decimal,
    ) -> Result<PricingCommandResult, DomainError> {
        let command = EnrollProductInChain {
            correlation_id: Uuid::new_v4(),
            product_id,
            shop_chain_id,
            initial_price,
        };
        handle_enroll_product_in_chain(&command, self.clock.as_ref(), self.log.as_ref()).await
    }

    /// Records a new price for `product_id` at `shop_id` of `shop_chain_id`.
    ///
    /// # Errors
    ///
    /// See [`handle_record_price_change`].
    pub async fn record_price_change(
        &self,
        product_id: i64,
        shop_chain_id: i64,
        shop_id: i64,
        new_price: Decimal,
    ) -> Result<PricingCommandResult, DomainError> {
        let command = RecordPriceChange {
            correlation_id: Uuid::new_v4(),
            product_id,
            shop_chain_id,
            shop_id,
            new_price,
        };
        handle_record_price_change(&command, self.clock.as_ref(), self.log.as_ref()).await
    }

    /// Rebuilds the price history of `product_id` in `shop_chain_id`.
    ///
    /// # Errors
    ///
    /// See [`query_handlers::get_price_history`].
    pub async fn get_price_history(
        &self,
        product_id: i64,
        shop_chain_id: i64,
    ) -> Result<PriceHistoryView, DomainError> {
        query_handlers::get_price_history(
            product_id,
            shop_chain_id,
            self.log.as_ref(),
            self.catalog.as_ref(),
        )
        .await
    }
}
