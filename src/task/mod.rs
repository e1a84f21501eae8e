//! Task lifecycle management.
//!
//! Tasks move through `New`, `Ongoing` and `Done`, may carry a due date while
//! ongoing, and are persisted as a full snapshot after every change. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
