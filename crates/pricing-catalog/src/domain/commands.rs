//! Commands for the catalog.

use pricing_core::command::Command;
use uuid::Uuid;

/// Command to create a product under a freshly generated id.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Display name.
    pub name: String,
    /// Product category.
    pub category: String,
}

/// Command to insert or replace the product with a known id.
#[derive(Debug, Clone)]
pub struct SaveProduct {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The product identifier.
    pub product_id: i64,
    /// Display name.
    pub name: String,
    /// Product category.
    pub category: String,
}

impl Command for CreateProduct {
    fn command_type(&self) -> &'static str {
        "catalog.create_product"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for SaveProduct {
    fn command_type(&self) -> &'static str {
        "catalog.save_product"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
