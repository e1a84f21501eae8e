//! Sample tasks used to populate a board that has no persisted data.

use super::{Priority, Task, TaskDomainError, TaskId, TaskRecord, TaskStatus};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;

struct Sample {
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: Priority,
    created_ago: Duration,
    due_in: Option<Duration>,
    completed_ago: Option<Duration>,
}

fn samples() -> [Sample; 6] {
    [
        Sample {
            title: "Design System Setup",
            description: "Create a shared component library so every screen of the board uses consistent styling.",
            status: TaskStatus::New,
            priority: Priority::High,
            created_ago: Duration::zero(),
            due_in: None,
            completed_ago: None,
        },
        Sample {
            title: "API Integration",
            description: "Wire the create, update and delete endpoints with proper error handling.",
            status: TaskStatus::Ongoing,
            priority: Priority::High,
            created_ago: Duration::days(1),
            due_in: Some(Duration::days(1)),
            completed_ago: None,
        },
        Sample {
            title: "User Authentication",
            description: "Implement sign-in with token based sessions and protected routes.",
            status: TaskStatus::Done,
            priority: Priority::Medium,
            created_ago: Duration::days(2),
            due_in: None,
            completed_ago: Some(Duration::days(1)),
        },
        Sample {
            title: "Database Optimization",
            description: "Review slow queries and add the indexes they need.",
            status: TaskStatus::Ongoing,
            priority: Priority::High,
            created_ago: Duration::hours(1),
            due_in: Some(Duration::minutes(-30)),
            completed_ago: None,
        },
        Sample {
            title: "Code Review Process",
            description: "Agree on a review checklist to keep code quality high and share knowledge.",
            status: TaskStatus::New,
            priority: Priority::Low,
            created_ago: Duration::hours(2),
            due_in: None,
            completed_ago: None,
        },
        Sample {
            title: "Testing Framework Setup",
            description: "Set up unit and integration testing for better reliability.",
            status: TaskStatus::Done,
            priority: Priority::Medium,
            created_ago: Duration::days(3),
            due_in: None,
            completed_ago: Some(Duration::days(2)),
        },
    ]
}

impl Sample {
    fn into_record(self, now: DateTime<Utc>) -> TaskRecord {
        TaskRecord {
            id: TaskId::new(),
            title: self.title.to_owned(),
            description: self.description.to_owned(),
            status: self.status,
            priority: self.priority,
            created_at: now - self.created_ago,
            updated_at: None,
            due_date: self.due_in.map(|offset| now + offset),
            completed_at: self.completed_ago.map(|offset| now - offset),
        }
    }
}

/// Builds the sample task set relative to the clock's current time.
///
/// The result is ordered newest first by creation time. One ongoing sample
/// is already overdue.
///
/// # Errors
///
/// Returns [`TaskDomainError`] if a sample breaks the task invariants.
pub fn sample_tasks(clock: &impl Clock) -> Result<Vec<Task>, TaskDomainError> {
    let now = clock.utc();
    let mut tasks = samples()
        .into_iter()
        .map(|sample| Task::from_record(sample.into_record(now)))
        .collect::<Result<Vec<_>, _>>()?;
    tasks.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
    Ok(tasks)
}
