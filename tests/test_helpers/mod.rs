//! Shared clock and task builders for integration tests.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::{Mutex, PoisonError};
use taskboard::task::domain::{Priority, Task, TaskContent, TaskStatus};

/// Clock that only moves when a test advances it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`.
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Monday 2 March 2026, 09:00 UTC.
#[fixture]
pub fn start_of_day() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
        .single()
        .expect("fixed timestamp is unambiguous")
}

/// Builds a task in `status` with one of each optional timestamp where the
/// status allows it.
///
/// # Errors
///
/// Returns an error if the title is blank or a transition is rejected.
pub fn task_in_status(
    title: &str,
    status: TaskStatus,
    priority: Priority,
    clock: &ManualClock,
) -> eyre::Result<Task> {
    let content = TaskContent::new(title, format!("{title} for the integration suite"))?;
    let mut task = Task::new(content, priority, None, clock);
    if status == TaskStatus::New {
        return Ok(task);
    }
    clock.advance(Duration::minutes(1));
    task.transition_to(
        TaskStatus::Ongoing,
        Some(clock.utc() + Duration::hours(1)),
        clock,
    )?;
    if status == TaskStatus::Done {
        clock.advance(Duration::minutes(1));
        task.transition_to(TaskStatus::Done, None, clock)?;
    }
    Ok(task)
}
