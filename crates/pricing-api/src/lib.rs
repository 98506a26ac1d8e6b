//! HTTP surface of the product price history service.
//!
//! The library half exists so integration tests can build the exact router
//! the binary serves.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
