//! Adapter implementations of the task store port.

pub mod memory;
pub mod sqlite;
