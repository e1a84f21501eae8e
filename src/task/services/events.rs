//! Notifications published by the board.

use crate::task::{domain::Task, ports::StoreError};
use tokio::sync::broadcast;
use tracing::trace;

/// Event delivered to board subscribers.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// The set of overdue tasks differs from the last published set.
    OverdueChanged {
        /// Every task that is overdue now.
        tasks: Vec<Task>,
    },
    /// A snapshot write failed. The in-memory board is unaffected.
    PersistenceFailed {
        /// Store error of the failed write.
        error: StoreError,
        /// Failed writes in a row, including this one.
        consecutive_failures: u32,
    },
    /// A snapshot write succeeded after one or more failures.
    PersistenceRecovered {
        /// Failed writes in a row before this success.
        after_failures: u32,
    },
}

/// Sends `event` to every current subscriber.
pub(crate) fn publish(sender: &broadcast::Sender<BoardEvent>, event: BoardEvent) {
    if sender.send(event).is_err() {
        trace!("board event dropped without subscribers");
    }
}
