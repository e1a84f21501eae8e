//! In-memory task store for tests and session-only boards.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskId},
    ports::{StoreError, TaskStore, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Clones share the same state, so a test can keep a handle to inspect what
/// the board wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    tasks: HashMap<TaskId, Task>,
    open: bool,
    opened_count: usize,
}

impl InMemoryStoreState {
    const fn ensure_open(&mut self) {
        if !self.open {
            self.open = true;
            self.opened_count += 1;
        }
    }
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let state = InMemoryStoreState {
            tasks: tasks.into_iter().map(|task| (task.id(), task)).collect(),
            ..InMemoryStoreState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Returns how many times the store went from closed to open.
    #[must_use]
    pub fn opened_count(&self) -> usize {
        self.read().map_or(0, |state| state.opened_count)
    }

    /// Returns whether the store is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.read().is_ok_and(|state| state.open)
    }

    /// Returns a copy of the stored task with `id`, if any.
    #[must_use]
    pub fn stored(&self, id: TaskId) -> Option<Task> {
        self.read()
            .ok()
            .and_then(|state| state.tasks.get(&id).cloned())
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().map_or(0, |state| state.tasks.len())
    }

    /// Returns whether no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, InMemoryStoreState>, StoreError> {
        self.state
            .read()
            .map_err(|err| StoreError::read(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, InMemoryStoreState>, StoreError> {
        self.state
            .write()
            .map_err(|err| StoreError::write(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn initialize(&self) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            StoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state.ensure_open();
        Ok(())
    }

    async fn load_all(&self) -> TaskStoreResult<Vec<Task>> {
        let mut state = self
            .state
            .write()
            .map_err(|err| StoreError::read(std::io::Error::other(err.to_string())))?;
        state.ensure_open();
        Ok(state.tasks.values().cloned().collect())
    }

    async fn replace_all(&self, tasks: &[Task]) -> TaskStoreResult<()> {
        let replacement: HashMap<TaskId, Task> =
            tasks.iter().map(|task| (task.id(), task.clone())).collect();
        let mut state = self.write()?;
        state.ensure_open();
        state.tasks = replacement;
        Ok(())
    }

    async fn delete_one(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state.ensure_open();
        state.tasks.remove(&id);
        Ok(())
    }

    async fn close(&self) {
        if let Ok(mut state) = self.state.write() {
            state.open = false;
        }
    }
}
