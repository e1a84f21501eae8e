//! Task board service: the authoritative in-memory task collection.

use super::{
    config::BoardConfig,
    events::{BoardEvent, publish},
    writer::SnapshotWriter,
};
use crate::task::{
    domain::{
        ParseTaskStatusError, Priority, Task, TaskContent, TaskDomainError, TaskId, TaskStatus,
        Transition, sample_tasks,
    },
    ports::{StoreError, TaskStore, TaskStoreResult},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with medium priority and no due date.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: Priority::default(),
            due_date: None,
        }
    }

    /// Sets the priority. Labels are parsed leniently.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Sets the planned due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Service-level errors surfaced to board callers.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Validation or transition rules rejected the request.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// No task has the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// A status name could not be parsed.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Whether board changes reach durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Every mutation is written to the store.
    Durable,
    /// The store could not be opened; changes live only in memory.
    SessionOnly,
}

/// Number of tasks per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Tasks in [`TaskStatus::New`].
    pub new: usize,
    /// Tasks in [`TaskStatus::Ongoing`].
    pub ongoing: usize,
    /// Tasks in [`TaskStatus::Done`].
    pub done: usize,
}

impl StatusCounts {
    /// Returns the count for `status`.
    #[must_use]
    pub const fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::New => self.new,
            TaskStatus::Ongoing => self.ongoing,
            TaskStatus::Done => self.done,
        }
    }
}

/// Task lifecycle manager.
///
/// Mutations are synchronous and apply to the in-memory collection first.
/// Each one then queues a full snapshot for the background writer; a failed
/// write never rolls the mutation back. Write failures are logged, published
/// as [`BoardEvent::PersistenceFailed`] and reported by [`Self::flush`].
#[derive(Debug)]
pub struct TaskBoard<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    config: BoardConfig,
    tasks: Vec<Task>,
    writer: Option<SnapshotWriter>,
    events: broadcast::Sender<BoardEvent>,
    overdue_ids: Vec<TaskId>,
}

impl<C> TaskBoard<C>
where
    C: Clock + Send + Sync,
{
    /// Opens the store and loads the persisted snapshot.
    ///
    /// If the store cannot be opened the board runs session-only. If the
    /// snapshot cannot be read the board starts from defaults: the sample
    /// tasks when [`BoardConfig::seed_sample_tasks`] is set, otherwise empty.
    /// An empty store is seeded the same way.
    pub async fn open<S>(store: Arc<S>, clock: Arc<C>, config: BoardConfig) -> Self
    where
        S: TaskStore + 'static,
    {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        let (tasks, writer) = match store.initialize().await {
            Ok(()) => {
                let tasks = load_snapshot(&*store, &*clock, &config).await;
                let writer =
                    SnapshotWriter::spawn(store, events.clone(), config.failure_alert_threshold);
                (tasks, Some(writer))
            }
            Err(err) => {
                warn!(error = %err, "task store unavailable; board changes are session-only");
                (default_tasks(&*clock, &config), None)
            }
        };
        info!(count = tasks.len(), durable = writer.is_some(), "task board opened");

        Self {
            clock,
            config,
            tasks,
            writer,
            events,
            overdue_ids: Vec::new(),
        }
    }

    /// Returns whether changes reach durable storage.
    #[must_use]
    pub const fn storage_mode(&self) -> StorageMode {
        if self.writer.is_some() {
            StorageMode::Durable
        } else {
            StorageMode::SessionOnly
        }
    }

    /// Returns the board configuration.
    #[must_use]
    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Subscribes to board events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Creates a task in [`TaskStatus::New`] at the head of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when the title or description is blank;
    /// the collection is left unchanged.
    pub fn create(&mut self, request: CreateTaskRequest) -> BoardResult<Task> {
        let content = TaskContent::new(request.title, request.description)?;
        let task = Task::new(content, request.priority, request.due_date, &*self.clock);
        self.tasks.insert(0, task.clone());
        debug!(task_id = %task.id(), priority = %task.priority(), "task created");
        self.after_mutation(Vec::new());
        Ok(task)
    }

    /// Moves a task to `target`.
    ///
    /// `due_date` is applied on transitions into [`TaskStatus::Ongoing`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotFound`] for an unknown task, or
    /// [`BoardError::Domain`] wrapping
    /// [`TaskDomainError::InvalidStateTransition`] when the status machine
    /// has no such edge; the task is left unchanged.
    pub fn transition(
        &mut self,
        id: TaskId,
        target: TaskStatus,
        due_date: Option<DateTime<Utc>>,
    ) -> BoardResult<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(BoardError::NotFound(id))?;
        let transition = task.transition_to(target, due_date, &*self.clock)?;
        let updated = task.clone();
        debug!(task_id = %id, ?transition, status = %updated.status(), "task transitioned");
        self.after_mutation(Vec::new());
        Ok(updated)
    }

    /// Moves a task to the status named by `target`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidStatus`] for an unknown status name, and
    /// otherwise the errors of [`Self::transition`].
    pub fn transition_named(
        &mut self,
        id: TaskId,
        target: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> BoardResult<Task> {
        let status = TaskStatus::try_from(target)?;
        self.transition(id, status, due_date)
    }

    /// Starts a new task.
    ///
    /// # Errors
    ///
    /// See [`Self::transition`].
    pub fn start(&mut self, id: TaskId, due_date: Option<DateTime<Utc>>) -> BoardResult<Task> {
        self.follow(id, Transition::Start, due_date)
    }

    /// Completes an ongoing task.
    ///
    /// # Errors
    ///
    /// See [`Self::transition`].
    pub fn complete(&mut self, id: TaskId) -> BoardResult<Task> {
        self.follow(id, Transition::Complete, None)
    }

    /// Sends an ongoing task back to new.
    ///
    /// # Errors
    ///
    /// See [`Self::transition`].
    pub fn send_back(&mut self, id: TaskId) -> BoardResult<Task> {
        self.follow(id, Transition::SendBack, None)
    }

    /// Reopens a done task.
    ///
    /// # Errors
    ///
    /// See [`Self::transition`].
    pub fn reopen(&mut self, id: TaskId, due_date: Option<DateTime<Utc>>) -> BoardResult<Task> {
        self.follow(id, Transition::Reopen, due_date)
    }

    /// Deletes a task from the board and the store.
    ///
    /// Returns the removed task, or `None` when no task had `id`.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let removed = self
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .map(|index| self.tasks.remove(index));
        debug!(task_id = %id, found = removed.is_some(), "task removed");
        self.after_mutation(vec![id]);
        removed
    }

    /// Returns the current snapshot, newest creation first.
    #[must_use]
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the task with `id`, if any.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Returns the tasks in `status`, newest creation first.
    #[must_use]
    pub fn tasks_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.status() == status)
            .cloned()
            .collect()
    }

    /// Returns the tasks in `status` in column order.
    ///
    /// Higher priority comes first. Within a priority the most recent
    /// activity for the column comes first: creation for new tasks, the last
    /// transition for ongoing tasks and completion for done tasks.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Vec<Task> {
        let mut column = self.tasks_by_status(status);
        column.sort_by(|left, right| {
            right
                .priority()
                .cmp(&left.priority())
                .then_with(|| column_activity(right).cmp(&column_activity(left)))
        });
        column
    }

    /// Returns the number of tasks per status.
    #[must_use]
    pub fn counts(&self) -> StatusCounts {
        self.tasks
            .iter()
            .fold(StatusCounts::default(), |mut counts, task| {
                match task.status() {
                    TaskStatus::New => counts.new += 1,
                    TaskStatus::Ongoing => counts.ongoing += 1,
                    TaskStatus::Done => counts.done += 1,
                }
                counts
            })
    }

    /// Returns the ongoing tasks whose due date is before `as_of`.
    #[must_use]
    pub fn list_overdue(&self, as_of: DateTime<Utc>) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.is_overdue(as_of))
            .cloned()
            .collect()
    }

    /// Returns the tasks that are overdue according to the board clock.
    #[must_use]
    pub fn overdue(&self) -> Vec<Task> {
        self.list_overdue(self.clock.utc())
    }

    /// Recomputes the overdue set and publishes it if it changed.
    ///
    /// Returns the new overdue tasks when the set of overdue identifiers
    /// differs from the last published one.
    pub fn refresh_overdue(&mut self) -> Option<Vec<Task>> {
        let overdue = self.overdue();
        let mut ids: Vec<TaskId> = overdue.iter().map(Task::id).collect();
        ids.sort_unstable();
        if ids == self.overdue_ids {
            return None;
        }

        self.overdue_ids = ids;
        info!(count = overdue.len(), "overdue tasks changed");
        publish(
            &self.events,
            BoardEvent::OverdueChanged {
                tasks: overdue.clone(),
            },
        );
        Some(overdue)
    }

    /// Waits for queued snapshots to be written.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] of the latest write, or
    /// [`StoreError::Unavailable`] when the board is session-only.
    pub async fn flush(&self) -> TaskStoreResult<()> {
        let Some(writer) = &self.writer else {
            return Err(StoreError::unavailable(std::io::Error::other(
                "task board is running session-only",
            )));
        };
        writer.flush().await
    }

    /// Writes what is queued and closes the store.
    pub async fn shutdown(self) {
        if let Some(writer) = self.writer {
            writer.shutdown().await;
        }
        info!("task board closed");
    }

    /// Applies `edge` only when the task sits at the edge's source status.
    fn follow(
        &mut self,
        id: TaskId,
        edge: Transition,
        due_date: Option<DateTime<Utc>>,
    ) -> BoardResult<Task> {
        let current = self.get(id).ok_or(BoardError::NotFound(id))?.status();
        if current != edge.source() {
            return Err(TaskDomainError::InvalidStateTransition {
                task_id: id,
                from: current,
                to: edge.target(),
            }
            .into());
        }
        self.transition(id, edge.target(), due_date)
    }

    fn after_mutation(&mut self, deletions: Vec<TaskId>) {
        if let Some(writer) = &self.writer {
            writer.submit(self.tasks.clone(), deletions);
        }
        self.refresh_overdue();
    }
}

async fn load_snapshot<S, C>(store: &S, clock: &C, config: &BoardConfig) -> Vec<Task>
where
    S: TaskStore + ?Sized,
    C: Clock,
{
    match store.load_all().await {
        Ok(tasks) if tasks.is_empty() => default_tasks(clock, config),
        Ok(mut tasks) => {
            tasks.sort_by(|left, right| {
                right
                    .created_at()
                    .cmp(&left.created_at())
                    .then_with(|| right.id().cmp(&left.id()))
            });
            tasks
        }
        Err(err) => {
            warn!(error = %err, "persisted tasks unreadable; starting from defaults");
            default_tasks(clock, config)
        }
    }
}

fn default_tasks<C: Clock>(clock: &C, config: &BoardConfig) -> Vec<Task> {
    if !config.seed_sample_tasks {
        return Vec::new();
    }
    sample_tasks(clock).unwrap_or_else(|err| {
        warn!(error = %err, "sample tasks rejected");
        Vec::new()
    })
}

fn column_activity(task: &Task) -> DateTime<Utc> {
    match task.status() {
        TaskStatus::New => task.created_at(),
        TaskStatus::Ongoing => task.updated_at().unwrap_or_else(|| task.created_at()),
        TaskStatus::Done => task
            .completed_at()
            .or_else(|| task.updated_at())
            .unwrap_or_else(|| task.created_at()),
    }
}
