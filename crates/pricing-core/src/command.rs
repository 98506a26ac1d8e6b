//! Command abstractions.

use uuid::Uuid;

/// Trait that all commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging).
    fn command_type(&self) -> &'static str;

    /// Correlation ID stored with every event the command produces.
    fn correlation_id(&self) -> Uuid;
}
