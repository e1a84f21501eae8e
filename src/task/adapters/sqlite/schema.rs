//! Diesel schema for task persistence.

diesel::table! {
    /// One record per task, keyed by task identifier.
    tasks (id) {
        /// Task identifier in hyphenated UUID form.
        id -> Text,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Lifecycle status (`New`, `Ongoing`, `Done`).
        status -> Text,
        /// Priority label (`low`, `medium`, `high`).
        priority -> Text,
        /// Creation timestamp, RFC 3339.
        created_at -> Text,
        /// Latest transition timestamp, RFC 3339.
        updated_at -> Nullable<Text>,
        /// Due date, RFC 3339.
        due_date -> Nullable<Text>,
        /// Completion timestamp, RFC 3339.
        completed_at -> Nullable<Text>,
    }
}

/// DDL applied on initialization. Every statement is idempotent.
pub const CREATE_SCHEMA: &str = concat!(
    "CREATE TABLE IF NOT EXISTS tasks (",
    "id TEXT PRIMARY KEY NOT NULL, ",
    "title TEXT NOT NULL, ",
    "description TEXT NOT NULL, ",
    "status TEXT NOT NULL, ",
    "priority TEXT NOT NULL DEFAULT 'medium', ",
    "created_at TEXT NOT NULL, ",
    "updated_at TEXT, ",
    "due_date TEXT, ",
    "completed_at TEXT",
    ");",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks (status);",
    "CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks (priority);",
    "CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks (created_at);",
    "CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks (due_date);",
);
