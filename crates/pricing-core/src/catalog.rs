//! Product catalog abstraction.
//!
//! The catalog is owned independently of the pricing history. A product may
//! exist without a pricing stream and a stream may exist for a product the
//! catalog has never seen, so readers must handle a miss explicitly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// The product identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Product category.
    pub category: String,
}

/// Keyed store of catalog records with last-write-wins semantics.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Looks up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    async fn get_product(&self, id: i64) -> Result<Option<Product>, DomainError>;

    /// Inserts or replaces a product.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be written.
    async fn save_product(&self, product: Product) -> Result<(), DomainError>;

    /// Lists every product, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store cannot be read.
    async fn list_products(&self) -> Result<Vec<Product>, DomainError>;
}
