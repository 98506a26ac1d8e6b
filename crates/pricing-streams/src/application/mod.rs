//! Application layer: command/query handlers and the service facade.

pub mod command_handlers;
pub mod query_handlers;
pub mod service;
