//! Serialized background writer for board snapshots.
//!
//! The board hands every post-mutation snapshot to a single worker task.
//! The worker runs one store operation at a time in submission order, and
//! folds snapshots that queued up behind a slow write into one write of the
//! newest snapshot. An older snapshot never overwrites a newer one.

use super::events::{BoardEvent, publish};
use crate::task::{
    domain::{Task, TaskId},
    ports::{StoreError, TaskStore, TaskStoreResult},
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

enum WriteCommand {
    Snapshot {
        tasks: Vec<Task>,
        deletions: Vec<TaskId>,
    },
    Flush(oneshot::Sender<TaskStoreResult<()>>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle to the snapshot worker task.
#[derive(Debug)]
pub struct SnapshotWriter {
    commands: mpsc::UnboundedSender<WriteCommand>,
    worker: JoinHandle<()>,
}

impl SnapshotWriter {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// Write outcomes are published on `events`; failures are escalated to
    /// error level once `failure_alert_threshold` of them happen in a row.
    #[must_use]
    pub fn spawn<S>(
        store: Arc<S>,
        events: broadcast::Sender<BoardEvent>,
        failure_alert_threshold: u32,
    ) -> Self
    where
        S: TaskStore + 'static,
    {
        let (commands, receiver) = mpsc::unbounded_channel();
        let health = WriteHealth {
            events,
            threshold: failure_alert_threshold.max(1),
            consecutive_failures: 0,
        };
        let worker = tokio::spawn(run_worker(store, receiver, health));
        Self { commands, worker }
    }

    /// Queues a snapshot, applying `deletions` before the snapshot itself.
    pub fn submit(&self, tasks: Vec<Task>, deletions: Vec<TaskId>) {
        if self
            .commands
            .send(WriteCommand::Snapshot { tasks, deletions })
            .is_err()
        {
            warn!("snapshot writer has stopped; snapshot dropped");
        }
    }

    /// Waits until every snapshot queued so far has been written.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of the most recent write, or
    /// [`StoreError::Write`] when the worker has stopped.
    pub async fn flush(&self) -> TaskStoreResult<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(WriteCommand::Flush(reply))
            .map_err(|_| writer_stopped())?;
        response.await.map_err(|_| writer_stopped())?
    }

    /// Writes what is queued, closes the store and stops the worker.
    pub async fn shutdown(self) {
        let (reply, done) = oneshot::channel();
        if self.commands.send(WriteCommand::Shutdown(reply)).is_ok() && done.await.is_err() {
            debug!("snapshot writer exited before acknowledging shutdown");
        }
        if let Err(err) = self.worker.await {
            warn!(error = %err, "snapshot writer task failed");
        }
    }
}

fn writer_stopped() -> StoreError {
    StoreError::write(std::io::Error::other("snapshot writer has stopped"))
}

#[derive(Default)]
struct Batch {
    snapshot: Option<Vec<Task>>,
    deletions: Vec<TaskId>,
    flush_waiters: Vec<oneshot::Sender<TaskStoreResult<()>>>,
    shutdown: Option<oneshot::Sender<()>>,
    coalesced: usize,
}

impl Batch {
    fn absorb(&mut self, command: WriteCommand) {
        match command {
            WriteCommand::Snapshot { tasks, deletions } => {
                if self.snapshot.replace(tasks).is_some() {
                    self.coalesced += 1;
                }
                self.deletions.extend(deletions);
            }
            WriteCommand::Flush(waiter) => self.flush_waiters.push(waiter),
            WriteCommand::Shutdown(done) => self.shutdown = Some(done),
        }
    }
}

struct WriteHealth {
    events: broadcast::Sender<BoardEvent>,
    threshold: u32,
    consecutive_failures: u32,
}

impl WriteHealth {
    fn record(&mut self, result: &TaskStoreResult<()>) {
        match result {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    info!(
                        after_failures = self.consecutive_failures,
                        "task store writes recovered"
                    );
                    publish(
                        &self.events,
                        BoardEvent::PersistenceRecovered {
                            after_failures: self.consecutive_failures,
                        },
                    );
                }
                self.consecutive_failures = 0;
            }
            Err(err) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures >= self.threshold {
                    error!(
                        error = %err,
                        consecutive_failures = self.consecutive_failures,
                        "task store keeps rejecting writes; board changes are session-only"
                    );
                } else {
                    warn!(
                        error = %err,
                        consecutive_failures = self.consecutive_failures,
                        "task snapshot write failed"
                    );
                }
                publish(
                    &self.events,
                    BoardEvent::PersistenceFailed {
                        error: err.clone(),
                        consecutive_failures: self.consecutive_failures,
                    },
                );
            }
        }
    }
}

async fn run_worker<S>(
    store: Arc<S>,
    mut commands: mpsc::UnboundedReceiver<WriteCommand>,
    mut health: WriteHealth,
) where
    S: TaskStore + 'static,
{
    let mut last_result: TaskStoreResult<()> = Ok(());

    while let Some(first) = commands.recv().await {
        let mut batch = Batch::default();
        batch.absorb(first);
        while let Ok(next) = commands.try_recv() {
            batch.absorb(next);
        }

        if batch.coalesced > 0 {
            debug!(skipped = batch.coalesced, "coalesced queued snapshots");
        }
        if let Some(snapshot) = batch.snapshot.take() {
            last_result = write_snapshot(&*store, &snapshot, &batch.deletions).await;
            health.record(&last_result);
        }

        for waiter in batch.flush_waiters.drain(..) {
            if waiter.send(last_result.clone()).is_err() {
                debug!("flush caller went away before the write finished");
            }
        }

        if let Some(done) = batch.shutdown.take() {
            store.close().await;
            if done.send(()).is_err() {
                debug!("shutdown caller went away");
            }
            return;
        }
    }

    store.close().await;
}

async fn write_snapshot<S>(
    store: &S,
    snapshot: &[Task],
    deletions: &[TaskId],
) -> TaskStoreResult<()>
where
    S: TaskStore + ?Sized,
{
    for id in deletions {
        if let Err(err) = store.delete_one(*id).await {
            warn!(task_id = %id, error = %err, "task record deletion failed");
        }
    }
    store.replace_all(snapshot).await?;
    debug!(count = snapshot.len(), "task snapshot persisted");
    Ok(())
}
