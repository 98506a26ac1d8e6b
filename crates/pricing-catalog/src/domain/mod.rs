//! Domain layer: catalog commands.

pub mod commands;
