//! Diesel row models for task and user persistence.

use super::schema::tasks;
use crate::task::domain::{PersistedTaskData, Task, TaskId, UserId};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: String,
    /// Free-form status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self::from_persisted(PersistedTaskData {
            id: TaskId::new(row.id),
            user_id: Some(UserId::new(row.user_id)),
            title: row.title,
            description: row.description,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

/// Single `id` column returned by `RETURNING id` statements.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct IdRow {
    /// Identifier of the affected row.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub id: i64,
}

/// Result of an existence probe.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub struct ExistsRow {
    /// Whether the probed row exists.
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub present: bool,
}
