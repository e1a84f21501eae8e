//! Task status and the transitions between statuses.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board column a task currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created, work has not started.
    New,
    /// Work in progress.
    Ongoing,
    /// Completed. Reversible through reopen.
    Done,
}

impl TaskStatus {
    /// Every status in board order.
    pub const ALL: [Self; 3] = [Self::New, Self::Ongoing, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Ongoing => "Ongoing",
            Self::Done => "Done",
        }
    }

    /// Returns whether transition to `target` is one of the board's edges.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        Transition::between(self, target).is_some()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "ongoing" => Ok(Self::Ongoing),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// A named edge of the status machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// `New -> Ongoing`.
    Start,
    /// `Ongoing -> Done`.
    Complete,
    /// `Ongoing -> New`.
    SendBack,
    /// `Done -> Ongoing`.
    Reopen,
}

impl Transition {
    /// Resolves the edge connecting `from` and `to`, if there is one.
    ///
    /// `New -> Done`, `Done -> New` and same-status requests have no edge.
    #[must_use]
    pub const fn between(from: TaskStatus, to: TaskStatus) -> Option<Self> {
        match (from, to) {
            (TaskStatus::New, TaskStatus::Ongoing) => Some(Self::Start),
            (TaskStatus::Ongoing, TaskStatus::Done) => Some(Self::Complete),
            (TaskStatus::Ongoing, TaskStatus::New) => Some(Self::SendBack),
            (TaskStatus::Done, TaskStatus::Ongoing) => Some(Self::Reopen),
            _ => None,
        }
    }

    /// Status the edge starts from.
    #[must_use]
    pub const fn source(self) -> TaskStatus {
        match self {
            Self::Start => TaskStatus::New,
            Self::Complete | Self::SendBack => TaskStatus::Ongoing,
            Self::Reopen => TaskStatus::Done,
        }
    }

    /// Status the edge leads to.
    #[must_use]
    pub const fn target(self) -> TaskStatus {
        match self {
            Self::Start | Self::Reopen => TaskStatus::Ongoing,
            Self::Complete => TaskStatus::Done,
            Self::SendBack => TaskStatus::New,
        }
    }
}
