//! Store port for durable task snapshots.

use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, StoreError>;

/// Durable storage of the full task collection, keyed by task identifier.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Opens or creates the underlying storage.
    ///
    /// Calling this on an already initialized store is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the storage cannot be opened.
    async fn initialize(&self) -> TaskStoreResult<()>;

    /// Returns every stored task, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Read`] on I/O failure or corrupt records.
    async fn load_all(&self) -> TaskStoreResult<Vec<Task>>;

    /// Replaces the whole stored collection with `tasks`.
    ///
    /// Either every record of `tasks` is stored and nothing else remains, or
    /// the previous collection is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] when the replacement did not commit.
    async fn replace_all(&self, tasks: &[Task]) -> TaskStoreResult<()>;

    /// Removes a single record. Missing records are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] when the deletion failed.
    async fn delete_one(&self, id: TaskId) -> TaskStoreResult<()>;

    /// Releases underlying resources. Closing twice is harmless.
    async fn close(&self);
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The storage could not be opened or is closed.
    #[error("storage unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// Reading the stored collection failed.
    #[error("storage read failed: {0}")]
    Read(Arc<dyn std::error::Error + Send + Sync>),

    /// Writing to the store failed.
    #[error("storage write failed: {0}")]
    Write(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps an error raised while opening storage.
    #[must_use]
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps an error raised while reading.
    #[must_use]
    pub fn read(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Read(Arc::new(err))
    }

    /// Wraps an error raised while writing.
    #[must_use]
    pub fn write(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Write(Arc::new(err))
    }
}
