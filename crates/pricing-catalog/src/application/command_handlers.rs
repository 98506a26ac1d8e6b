//! Command handlers for the catalog.

use pricing_core::catalog::{Product, ProductCatalog};
use pricing_core::command::Command;
use pricing_core::error::DomainError;
use pricing_core::ids::IdGenerator;
use tracing::{info, instrument};

use crate::domain::commands::{CreateProduct, SaveProduct};

fn validate_details(name: &str, category: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("product name must not be blank".into()));
    }
    if category.trim().is_empty() {
        return Err(DomainError::Validation(
            "product category must not be blank".into(),
        ));
    }
    Ok(())
}

/// Handles `CreateProduct`: stores a new product under a generated id.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name or category is blank and
/// `DomainError::Infrastructure` if the catalog cannot be written.
#[instrument(
    skip_all,
    fields(command = command.command_type(), correlation_id = %command.correlation_id)
)]
pub async fn handle_create_product(
    command: &CreateProduct,
    ids: &dyn IdGenerator,
    catalog: &dyn ProductCatalog,
) -> Result<Product, DomainError> {
    validate_details(&command.name, &command.category)?;

    let product = Product {
        id: ids.next_id(),
        name: command.name.clone(),
        category: command.category.clone(),
    };
    catalog.save_product(product.clone()).await?;
    info!(product_id = product.id, "product created");
    Ok(product)
}

/// Handles `SaveProduct`: inserts or replaces the product with the given id.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name or category is blank and
/// `DomainError::Infrastructure` if the catalog cannot be written.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        product_id = command.product_id,
        correlation_id = %command.correlation_id,
    )
)]
pub async fn handle_save_product(
    command: &SaveProduct,
    catalog: &dyn ProductCatalog,
) -> Result<Product, DomainError> {
    validate_details(&command.name, &command.category)?;

    let product = Product {
        id: command.product_id,
        name: command.name.clone(),
        category: command.category.clone(),
    };
    catalog.save_product(product.clone()).await?;
    Ok(product)
}
