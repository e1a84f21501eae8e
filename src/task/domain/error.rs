//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The requested status change is not one of the board's edges.
    #[error("invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested target status.
        to: TaskStatus,
    },

    /// A persisted record violates the task field invariants.
    #[error("inconsistent task record {task_id}: {reason}")]
    InconsistentRecord {
        /// Identifier stored in the record.
        task_id: TaskId,
        /// Which invariant the record breaks.
        reason: &'static str,
    },
}

impl TaskDomainError {
    /// Returns whether the error rejects creation input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyTitle | Self::EmptyDescription)
    }
}

/// Error returned while parsing task statuses from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
