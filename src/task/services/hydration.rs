//! Hydration of normalized task records into task aggregates.
//!
//! Records carry foreign keys only. Hydration resolves the author and
//! assignee names and the label collection through a [`ReferenceLookup`].
//! Unset references are skipped rather than looked up, and a failed lookup
//! aborts the whole batch so no caller ever sees a partially hydrated task.

use crate::task::{
    domain::{PersistedTaskData, Task, TaskRecord, User, UserId},
    ports::{ReferenceLookup, TaskStoreResult},
};

/// Hydrates a single record.
///
/// # Errors
///
/// Propagates the first lookup failure.
pub fn hydrate_task<L>(record: TaskRecord, lookup: &mut L) -> TaskStoreResult<Task>
where
    L: ReferenceLookup + ?Sized,
{
    let TaskRecord {
        id,
        opened,
        closed,
        author_id,
        assigned_id,
        title,
        content,
    } = record;

    let author = resolve_user(author_id, lookup)?;
    let assigned = resolve_user(assigned_id, lookup)?;
    let labels = lookup.task_labels(id)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id,
        opened,
        closed,
        author,
        assigned,
        title,
        content,
        labels,
    }))
}

/// Hydrates records in order.
///
/// # Errors
///
/// Propagates the first lookup failure; no tasks are returned in that case.
pub fn hydrate_tasks<L>(records: Vec<TaskRecord>, lookup: &mut L) -> TaskStoreResult<Vec<Task>>
where
    L: ReferenceLookup + ?Sized,
{
    records
        .into_iter()
        .map(|record| hydrate_task(record, &mut *lookup))
        .collect()
}

fn resolve_user<L>(id: Option<UserId>, lookup: &mut L) -> TaskStoreResult<Option<User>>
where
    L: ReferenceLookup + ?Sized,
{
    id.map(|user_id| lookup.user_name(user_id).map(|name| User::new(user_id, name)))
        .transpose()
}
