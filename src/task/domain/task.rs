//! Task aggregate root and its persisted record form.

use super::{Priority, TaskDomainError, TaskId, TaskStatus, Transition};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated title and description for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContent {
    title: String,
    description: String,
}

impl TaskContent {
    /// Creates validated task content.
    ///
    /// Surrounding whitespace is trimmed from both values.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EmptyDescription`] when a value is blank.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let normalized_title = raw_title.trim();
        if normalized_title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }

        let raw_description = description.into();
        let normalized_description = raw_description.trim();
        if normalized_description.is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }

        Ok(Self {
            title: normalized_title.to_owned(),
            description: normalized_description.to_owned(),
        })
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Task aggregate root.
///
/// Serializes as a [`TaskRecord`]; deserializing validates the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TaskRecord", try_from = "TaskRecord")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    priority: Priority,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

/// Persisted layout of a task, one record per task keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Priority label; missing or unknown labels read as medium.
    #[serde(default)]
    pub priority: Priority,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest transition timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Deadline while the task is ongoing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Completion timestamp while the task is done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a task in [`TaskStatus::New`].
    ///
    /// A due date given here is kept as the planned deadline; it only counts
    /// towards overdue detection once the task is ongoing.
    #[must_use]
    pub fn new(
        content: TaskContent,
        priority: Priority,
        due_date: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: TaskId::new(),
            title: content.title,
            description: content.description,
            priority,
            status: TaskStatus::New,
            created_at: clock.utc(),
            updated_at: None,
            due_date,
            completed_at: None,
        }
    }

    /// Reconstructs a task from its persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::EmptyDescription`] for blank text, and
    /// [`TaskDomainError::InconsistentRecord`] when the completion or due
    /// date fields disagree with the status.
    pub fn from_record(record: TaskRecord) -> Result<Self, TaskDomainError> {
        let TaskRecord {
            id,
            title,
            description,
            status,
            priority,
            created_at,
            updated_at,
            due_date,
            completed_at,
        } = record;

        if title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if description.trim().is_empty() {
            return Err(TaskDomainError::EmptyDescription);
        }
        match (status, completed_at.is_some()) {
            (TaskStatus::Done, false) => {
                return Err(inconsistent(id, "done task without completion time"));
            }
            (TaskStatus::New | TaskStatus::Ongoing, true) => {
                return Err(inconsistent(id, "completion time on unfinished task"));
            }
            _ => {}
        }
        if status == TaskStatus::Done && due_date.is_some() {
            return Err(inconsistent(id, "due date on done task"));
        }

        Ok(Self {
            id,
            title,
            description,
            priority,
            status,
            created_at,
            updated_at,
            due_date,
            completed_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest transition timestamp, if any transition happened.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the completion timestamp while the task is done.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns whether the task is ongoing with a due date before `as_of`.
    #[must_use]
    pub fn is_overdue(&self, as_of: DateTime<Utc>) -> bool {
        self.status == TaskStatus::Ongoing && self.due_date.is_some_and(|due| due < as_of)
    }

    /// Moves the task to `target`, applying the field rules of the edge.
    ///
    /// `due_date` is applied on edges into [`TaskStatus::Ongoing`]; on start
    /// without a due date the planned deadline from creation is kept. Other
    /// edges clear the due date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when no edge
    /// connects the current status and `target`. The task is left unchanged.
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        due_date: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Result<Transition, TaskDomainError> {
        let transition = Transition::between(self.status, target).ok_or(
            TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            },
        )?;

        let timestamp = clock.utc();
        match transition {
            Transition::Start => {
                if due_date.is_some() {
                    self.due_date = due_date;
                }
            }
            Transition::Reopen => self.due_date = due_date,
            Transition::Complete | Transition::SendBack => self.due_date = None,
        }
        self.completed_at = (transition == Transition::Complete).then_some(timestamp);
        self.status = transition.target();
        self.updated_at = Some(timestamp);
        Ok(transition)
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            created_at: task.created_at,
            updated_at: task.updated_at,
            due_date: task.due_date,
            completed_at: task.completed_at,
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskDomainError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Self::from_record(record)
    }
}

const fn inconsistent(task_id: TaskId, reason: &'static str) -> TaskDomainError {
    TaskDomainError::InconsistentRecord { task_id, reason }
}
