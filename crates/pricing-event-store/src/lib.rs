//! Event log adapters for the price history service.
//!
//! `InMemoryEventLog` backs tests and local runs without a database;
//! `PgEventLog` is the durable implementation.

pub mod memory_event_log;
pub mod migrations;
pub mod pg_event_log;

pub use memory_event_log::InMemoryEventLog;
pub use pg_event_log::PgEventLog;
