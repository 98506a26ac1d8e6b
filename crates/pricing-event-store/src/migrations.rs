//! Event log database schema.

use sqlx::migrate::Migrator;

/// Migrations creating the `stream_events` table.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
