//! In-memory implementation of the `ProductCatalog` trait.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use pricing_core::catalog::{Product, ProductCatalog};
use pricing_core::error::DomainError;

/// Process-local catalog keyed by product id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    products: Arc<RwLock<HashMap<i64, Product>>>,
}

impl InMemoryProductCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DomainError {
    DomainError::Infrastructure("in-memory catalog lock poisoned".into())
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn get_product(&self, id: i64) -> Result<Option<Product>, DomainError> {
        let products = self.products.read().map_err(poisoned)?;
        Ok(products.get(&id).cloned())
    }

    async fn save_product(&self, product: Product) -> Result<(), DomainError> {
        let mut products = self.products.write().map_err(poisoned)?;
        products.insert(product.id, product);
        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let products = self.products.read().map_err(poisoned)?;
        let mut listed: Vec<Product> = products.values().cloned().collect();
        listed.sort_by_key(|p| p.id);
        Ok(listed)
    }
}
