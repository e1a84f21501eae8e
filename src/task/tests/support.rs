//! Shared fixtures for task unit tests.

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskStore, TaskStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use mockall::mock;
use rstest::fixture;
use std::sync::{Mutex, PoisonError};

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

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

#[fixture]
pub fn manual_clock(start_of_day: DateTime<Utc>) -> ManualClock {
    ManualClock::at(start_of_day)
}

mock! {
    pub Store {}

    #[async_trait]
    impl TaskStore for Store {
        async fn initialize(&self) -> TaskStoreResult<()>;
        async fn load_all(&self) -> TaskStoreResult<Vec<Task>>;
        async fn replace_all(&self, tasks: &[Task]) -> TaskStoreResult<()>;
        async fn delete_one(&self, id: TaskId) -> TaskStoreResult<()>;
        async fn close(&self);
    }
}
