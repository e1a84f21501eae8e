//! `SQLite` store implementation for task snapshots.

use super::{models::TaskRow, schema::CREATE_SCHEMA, schema::tasks};
use crate::task::{
    domain::{Priority, Task, TaskId, TaskRecord, TaskStatus},
    ports::{StoreError, TaskStore, TaskStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info};

/// `SQLite` connection pool type used by the task store.
pub type TaskSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Connection settings for [`SqliteTaskStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteStoreConfig {
    /// Database file path (or any URL Diesel's `SQLite` backend accepts).
    pub database_url: String,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl SqliteStoreConfig {
    /// Default number of pooled connections.
    pub const DEFAULT_POOL_SIZE: u32 = 2;

    /// Creates settings for a database file at `path`.
    #[must_use]
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: path.as_ref().to_string_lossy().into_owned(),
            ..Self::default()
        }
    }

}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            database_url: "taskboard.sqlite3".to_owned(),
            pool_size: Self::DEFAULT_POOL_SIZE,
        }
    }
}

/// `SQLite`-backed task store.
///
/// The pool is opened lazily: every operation initializes a store that is
/// not open yet, including one that was closed before.
#[derive(Debug)]
pub struct SqliteTaskStore {
    config: SqliteStoreConfig,
    pool: RwLock<Option<TaskSqlitePool>>,
}

impl SqliteTaskStore {
    /// Creates a store for the given settings without opening it.
    #[must_use]
    pub const fn new(config: SqliteStoreConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    /// Returns the connection settings.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Returns whether the pool is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current_pool().is_some()
    }

    fn current_pool(&self) -> Option<TaskSqlitePool> {
        self.pool.read().ok().and_then(|slot| slot.clone())
    }

    async fn pool(&self) -> TaskStoreResult<TaskSqlitePool> {
        if let Some(pool) = self.current_pool() {
            return Ok(pool);
        }
        self.initialize().await?;
        self.current_pool().ok_or_else(|| {
            StoreError::unavailable(std::io::Error::other(
                "store was closed while it was being opened",
            ))
        })
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool().await?;
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::unavailable)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::unavailable)?
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn initialize(&self) -> TaskStoreResult<()> {
        if self.is_open() {
            return Ok(());
        }

        let config = self.config.clone();
        let pool = tokio::task::spawn_blocking(move || open_pool(&config))
            .await
            .map_err(StoreError::unavailable)??;

        let mut slot = self
            .pool
            .write()
            .map_err(|err| StoreError::unavailable(std::io::Error::other(err.to_string())))?;
        if slot.is_none() {
            *slot = Some(pool);
            info!(database = %self.config.database_url, "task store opened");
        }
        Ok(())
    }

    async fn load_all(&self) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(StoreError::read)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn replace_all(&self, snapshot: &[Task]) -> TaskStoreResult<()> {
        let rows: Vec<TaskRow> = snapshot.iter().map(to_row).collect();
        let count = rows.len();
        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|transaction| {
                    diesel::delete(tasks::table).execute(transaction)?;
                    for row in &rows {
                        diesel::insert_into(tasks::table)
                            .values(row)
                            .execute(transaction)?;
                    }
                    Ok(())
                })
                .map_err(StoreError::write)
        })
        .await?;
        debug!(count, "task snapshot replaced");
        Ok(())
    }

    async fn delete_one(&self, id: TaskId) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            diesel::delete(tasks::table.filter(tasks::id.eq(id.to_string())))
                .execute(connection)
                .map_err(StoreError::write)?;
            Ok(())
        })
        .await
    }

    async fn close(&self) {
        let closed = self
            .pool
            .write()
            .ok()
            .and_then(|mut slot| slot.take())
            .is_some();
        if closed {
            info!(database = %self.config.database_url, "task store closed");
        }
    }
}

fn open_pool(config: &SqliteStoreConfig) -> TaskStoreResult<TaskSqlitePool> {
    // The pool builder retries failed connections until its timeout, so an
    // unreachable database is reported from a single direct attempt instead.
    let probe =
        SqliteConnection::establish(&config.database_url).map_err(StoreError::unavailable)?;
    drop(probe);

    let manager = ConnectionManager::<SqliteConnection>::new(config.database_url.as_str());
    let pool = Pool::builder()
        .max_size(config.pool_size.max(1))
        .build(manager)
        .map_err(StoreError::unavailable)?;
    let mut connection = pool.get().map_err(StoreError::unavailable)?;
    connection
        .batch_execute(CREATE_SCHEMA)
        .map_err(StoreError::unavailable)?;
    Ok(pool)
}

fn to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().to_string(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        created_at: format_timestamp(task.created_at()),
        updated_at: task.updated_at().map(format_timestamp),
        due_date: task.due_date().map(format_timestamp),
        completed_at: task.completed_at().map(format_timestamp),
    }
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        status,
        priority,
        created_at,
        updated_at,
        due_date,
        completed_at,
    } = row;

    let record = TaskRecord {
        id: id.parse::<TaskId>().map_err(StoreError::read)?,
        title,
        description,
        status: TaskStatus::try_from(status.as_str()).map_err(StoreError::read)?,
        priority: Priority::from_label(&priority),
        created_at: parse_timestamp(&created_at)?,
        updated_at: updated_at.as_deref().map(parse_timestamp).transpose()?,
        due_date: due_date.as_deref().map(parse_timestamp).transpose()?,
        completed_at: completed_at.as_deref().map(parse_timestamp).transpose()?,
    };
    Task::from_record(record).map_err(StoreError::read)
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str) -> TaskStoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(StoreError::read)
}
