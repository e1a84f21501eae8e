//! Application services for the task board.
//!
//! [`TaskBoard`] owns the task collection and enforces the lifecycle rules.
//! [`SnapshotWriter`] serializes writes to the store in the background, and
//! [`OverdueMonitor`] re-evaluates due dates on a timer.

mod board;
mod config;
mod events;
mod overdue;
mod writer;

pub use board::{
    BoardError, BoardResult, CreateTaskRequest, StatusCounts, StorageMode, TaskBoard,
};
pub use config::{BoardConfig, BoardConfigError};
pub use events::BoardEvent;
pub use overdue::{OverdueMonitor, SharedBoard};
pub use writer::SnapshotWriter;
