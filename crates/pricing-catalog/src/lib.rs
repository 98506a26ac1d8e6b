//! Product catalog.
//!
//! A keyed store of product records, owned independently of price history.
//! Writes are last-write-wins; nothing here is event-sourced.

pub mod application;
pub mod domain;
mod in_memory;

pub use in_memory::InMemoryProductCatalog;
