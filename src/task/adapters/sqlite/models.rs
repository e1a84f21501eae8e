//! Diesel row model for task persistence.

use super::schema::tasks;
use diesel::prelude::*;

/// Stored task row, used for both queries and inserts.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Task identifier.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Priority label.
    pub priority: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Latest transition timestamp.
    pub updated_at: Option<String>,
    /// Due date.
    pub due_date: Option<String>,
    /// Completion timestamp.
    pub completed_at: Option<String>,
}
