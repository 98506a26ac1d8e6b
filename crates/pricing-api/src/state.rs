//! Shared application state.

use std::sync::Arc;

use pricing_catalog::InMemoryProductCatalog;
use pricing_core::catalog::ProductCatalog;
use pricing_core::clock::{Clock, SystemClock};
use pricing_core::event_log::EventLog;
use pricing_core::ids::{IdGenerator, RandomIdGenerator};
use pricing_event_store::InMemoryEventLog;
use pricing_streams::application::service::PricingStreamService;

/// Application state shared across all request handlers.
///
/// Every collaborator is passed in explicitly; handlers reach nothing
/// through globals.
#[derive(Clone)]
pub struct AppState {
    /// Price history service.
    pub pricing: PricingStreamService,
    /// Product catalog, shared with `pricing`.
    pub catalog: Arc<dyn ProductCatalog>,
    /// Source of ids for newly created products.
    pub ids: Arc<dyn IdGenerator>,
    /// Name of the event log backend, reported by `/health`.
    pub event_log_backend: &'static str,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        event_log: Arc<dyn EventLog>,
        event_log_backend: &'static str,
        catalog: Arc<dyn ProductCatalog>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            pricing: PricingStreamService::new(event_log, catalog.clone(), clock),
            catalog,
            ids,
            event_log_backend,
        }
    }

    /// State backed by a fresh in-memory log and an empty catalog.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryEventLog::new()),
            "memory",
            Arc::new(InMemoryProductCatalog::new()),
            Arc::new(SystemClock),
            Arc::new(RandomIdGenerator),
        )
    }
}
