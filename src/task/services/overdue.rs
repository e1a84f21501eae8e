//! Periodic overdue detection.

use super::board::TaskBoard;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

/// Board shared between callers and background tasks.
pub type SharedBoard<C> = Arc<Mutex<TaskBoard<C>>>;

/// Background task that re-evaluates overdue tasks on a fixed period.
///
/// Each tick calls [`TaskBoard::refresh_overdue`], which publishes
/// [`super::BoardEvent::OverdueChanged`] when the overdue set changed. The
/// first tick fires immediately. The task stops when the monitor is stopped
/// or dropped.
#[derive(Debug)]
pub struct OverdueMonitor {
    handle: JoinHandle<()>,
}

impl OverdueMonitor {
    /// Smallest accepted polling period.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// Starts polling `board` every `period`.
    #[must_use]
    pub fn spawn<C>(board: SharedBoard<C>, period: Duration) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        let tick_period = period.max(Self::MIN_PERIOD);
        let handle = tokio::spawn(async move {
            let mut ticker = interval(tick_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let changed = board.lock().await.refresh_overdue();
                if let Some(tasks) = changed {
                    debug!(count = tasks.len(), "overdue check published changes");
                }
            }
        });
        Self { handle }
    }

    /// Stops polling.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for OverdueMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
