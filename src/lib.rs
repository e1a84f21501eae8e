//! Taskboard: a persistent task board.
//!
//! This crate keeps a collection of tasks, moves them through a three-state
//! lifecycle, flags ongoing tasks whose due date has passed and persists the
//! collection to durable storage without blocking callers.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage
//! - **Adapters**: Concrete store implementations (`SQLite`, in-memory)
//! - **Services**: The board itself and its background tasks
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, overdue detection and persistence
//! - [`telemetry`]: Tracing subscriber setup for binaries

pub mod task;
pub mod telemetry;
