//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::event_log::NewEvent;
use crate::stream::{StreamKey, StreamPosition};

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier, used by the log for deduplication.
    pub event_id: Uuid,
    /// Type tag persisted next to the payload.
    pub event_type: String,
    /// Stream this event belongs to.
    pub stream_key: StreamKey,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
    /// Position the log assigned, `None` until the event is appended.
    pub position: Option<StreamPosition>,
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type tag (part of the wire contract).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload cannot be encoded.
    fn to_payload(&self) -> Result<serde_json::Value, DomainError>;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;

    /// Builds the record handed to the event log on append.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the payload cannot be encoded.
    fn to_new_event(&self) -> Result<NewEvent, DomainError> {
        let meta = self.metadata();
        Ok(NewEvent {
            event_id: meta.event_id,
            event_type: self.event_type().to_owned(),
            payload: self.to_payload()?,
            correlation_id: meta.correlation_id,
            occurred_at: meta.occurred_at,
        })
    }
}
