//! Query handlers for the catalog.

use pricing_core::catalog::{Product, ProductCatalog};
use pricing_core::error::DomainError;

/// Retrieves a product by id.
///
/// # Errors
///
/// Returns `DomainError::ProductNotFound` if the catalog has no such product.
pub async fn get_product_by_id(
    product_id: i64,
    catalog: &dyn ProductCatalog,
) -> Result<Product, DomainError> {
    catalog
        .get_product(product_id)
        .await?
        .ok_or(DomainError::ProductNotFound(product_id))
}

/// Lists all products, ordered by id.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the catalog cannot be read.
pub async fn list_products(catalog: &dyn ProductCatalog) -> Result<Vec<Product>, DomainError> {
    catalog.list_products().await
}
