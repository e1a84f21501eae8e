//! Task priority levels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Relative importance of a task.
///
/// Parsing is lenient: anything other than `low` or `high` (ignoring case
/// and surrounding whitespace) resolves to [`Priority::Medium`], including
/// missing, null and non-string values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Can wait.
    Low,
    /// The default level.
    #[default]
    Medium,
    /// Needs attention first.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Resolves a free-form label, falling back to [`Priority::Medium`].
    #[must_use]
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    /// Resolves an optional label; `None` means [`Priority::Medium`].
    #[must_use]
    pub fn from_optional_label(value: Option<&str>) -> Self {
        value.map_or(Self::Medium, Self::from_label)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        Self::from_label(value)
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_optional_label(value.as_str()))
    }
}
