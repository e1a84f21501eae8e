//! `SQLite` adapter for durable task snapshots.

mod models;
mod schema;
mod store;

pub use store::{SqliteStoreConfig, SqliteTaskStore, TaskSqlitePool};
