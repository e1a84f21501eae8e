//! Domain model for the task board.
//!
//! The domain covers the task aggregate, its status machine and the persisted
//! record form. It has no knowledge of storage or scheduling.

mod error;
mod ids;
mod priority;
mod samples;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use priority::Priority;
pub use samples::sample_tasks;
pub use status::{TaskStatus, Transition};
pub use task::{Task, TaskContent, TaskRecord};
