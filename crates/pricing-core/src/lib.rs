//! Pricing Core: shared abstractions for the price history service.
//!
//! This crate defines the event log contract, the catalog contract, and the
//! small set of types every bounded context depends on. It contains no
//! infrastructure code.

pub mod catalog;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod event_log;
pub mod ids;
pub mod projection;
pub mod stream;
