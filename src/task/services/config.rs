//! Board configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Tunables for [`super::TaskBoard`] and its background tasks.
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides:
///
/// ```json
/// { "overdue_poll_interval_secs": 30, "seed_sample_tasks": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Seconds between overdue checks.
    pub overdue_poll_interval_secs: u64,
    /// Populate the sample task set when there is no persisted data.
    pub seed_sample_tasks: bool,
    /// Consecutive write failures after which failures are logged as errors.
    pub failure_alert_threshold: u32,
    /// Buffered board events per subscriber.
    pub event_capacity: usize,
}

impl BoardConfig {
    /// Default seconds between overdue checks.
    pub const DEFAULT_OVERDUE_POLL_INTERVAL_SECS: u64 = 60;
    /// Default consecutive write failures before escalating.
    pub const DEFAULT_FAILURE_ALERT_THRESHOLD: u32 = 3;
    /// Default event buffer per subscriber.
    pub const DEFAULT_EVENT_CAPACITY: usize = 64;

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`BoardConfigError::Parse`] for malformed JSON or mistyped
    /// fields.
    pub fn from_json_str(json: &str) -> Result<Self, BoardConfigError> {
        serde_json::from_str(json).map_err(BoardConfigError::Parse)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`BoardConfigError::Read`] when the file cannot be read, or
    /// [`BoardConfigError::Parse`] when its content is invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BoardConfigError> {
        let config_path = path.as_ref();
        let json =
            std::fs::read_to_string(config_path).map_err(|source| BoardConfigError::Read {
                path: config_path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&json)
    }

    /// Returns the overdue polling period.
    #[must_use]
    pub const fn overdue_poll_interval(&self) -> Duration {
        Duration::from_secs(self.overdue_poll_interval_secs)
    }

    /// Sets the overdue polling period in seconds.
    #[must_use]
    pub const fn with_overdue_poll_interval_secs(mut self, seconds: u64) -> Self {
        self.overdue_poll_interval_secs = seconds;
        self
    }

    /// Enables or disables sample tasks for boards without data.
    #[must_use]
    pub const fn with_seed_sample_tasks(mut self, enabled: bool) -> Self {
        self.seed_sample_tasks = enabled;
        self
    }

    /// Sets the consecutive write failures before escalating.
    #[must_use]
    pub const fn with_failure_alert_threshold(mut self, threshold: u32) -> Self {
        self.failure_alert_threshold = threshold;
        self
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            overdue_poll_interval_secs: Self::DEFAULT_OVERDUE_POLL_INTERVAL_SECS,
            seed_sample_tasks: false,
            failure_alert_threshold: Self::DEFAULT_FAILURE_ALERT_THRESHOLD,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Errors raised while loading a [`BoardConfig`].
#[derive(Debug, Error)]
pub enum BoardConfigError {
    /// The configuration file could not be read.
    #[error("failed to read board config {}: {source}", .path.display())]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration is not valid JSON for [`BoardConfig`].
    #[error("invalid board config: {0}")]
    Parse(#[source] serde_json::Error),
}
