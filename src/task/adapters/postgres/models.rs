//! Diesel row models for task persistence and their mapping to domain records.

use super::schema::{tasks, tasks_labels};
use crate::task::domain::{TaskId, TaskRecord, UserId};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task headers.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Opening timestamp.
    pub opened: DateTime<Utc>,
    /// Closing timestamp.
    pub closed: Option<DateTime<Utc>>,
    /// Author key.
    pub author_id: Option<i64>,
    /// Assignee key.
    pub assigned_id: Option<i64>,
    /// Task title.
    pub title: String,
    /// Task body.
    pub content: String,
}

/// Insert model for task headers. `id` is generated by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow<'a> {
    /// Opening timestamp.
    pub opened: DateTime<Utc>,
    /// Author key.
    pub author_id: Option<i64>,
    /// Assignee key.
    pub assigned_id: Option<i64>,
    /// Task title.
    pub title: &'a str,
    /// Task body.
    pub content: &'a str,
}

/// Insert model for the label join table.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = tasks_labels)]
pub struct TaskLabelRow {
    /// Associated task.
    pub task_id: i64,
    /// Associated label.
    pub label_id: i64,
}

/// Columns `update_task` is allowed to write.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset<'a> {
    /// Author key.
    pub author_id: Option<i64>,
    /// Assignee key.
    pub assigned_id: Option<i64>,
    /// Task title.
    pub title: &'a str,
    /// Task body.
    pub content: &'a str,
}

/// Maps a task row to its domain record.
///
/// A stored reference of zero is treated the same as `NULL`.
pub fn row_to_record(row: TaskRow) -> TaskRecord {
    let TaskRow {
        id,
        opened,
        closed,
        author_id,
        assigned_id,
        title,
        content,
    } = row;

    TaskRecord {
        id: TaskId::new(id),
        opened,
        closed,
        author_id: user_ref(author_id),
        assigned_id: user_ref(assigned_id),
        title,
        content,
    }
}

fn user_ref(raw: Option<i64>) -> Option<UserId> {
    raw.filter(|id| *id != 0).map(UserId::new)
}
