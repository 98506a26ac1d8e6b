//! Domain layer: stream addressing, events, commands and the history fold.

pub mod commands;
pub mod events;
pub mod history;
pub mod stream_key;
