//! Temporary database fixtures for `SQLite` integration tests.

use rstest::fixture;
use std::path::PathBuf;
use taskboard::task::adapters::sqlite::{SqliteStoreConfig, SqliteTaskStore};
use tempfile::TempDir;

/// Scratch directory holding one database file.
///
/// The directory is removed when the value is dropped, so tests must keep it
/// alive for as long as they use the store.
pub struct ScratchDatabase {
    dir: TempDir,
}

impl ScratchDatabase {
    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("tasks.sqlite3")
    }

    /// Creates a fresh, unopened store for the database file.
    #[must_use]
    pub fn store(&self) -> SqliteTaskStore {
        SqliteTaskStore::new(SqliteStoreConfig::for_path(self.path()))
    }

    /// Creates a store whose file sits in a directory that does not exist.
    #[must_use]
    pub fn unreachable_store(&self) -> SqliteTaskStore {
        let path = self.dir.path().join("missing").join("nested").join("tasks.sqlite3");
        SqliteTaskStore::new(SqliteStoreConfig::for_path(path))
    }
}

/// Provides an empty scratch database.
#[fixture]
pub fn database() -> ScratchDatabase {
    ScratchDatabase {
        dir: tempfile::tempdir().expect("temporary directory should be creatable"),
    }
}
