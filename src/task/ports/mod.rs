//! Port contracts for task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the board service.

pub mod store;

pub use store::{StoreError, TaskStore, TaskStoreResult};
