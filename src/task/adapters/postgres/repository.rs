//! `PostgreSQL` task store.
//!
//! Each operation checks a connection out of the pool, opens one
//! [`TransactionUnit`] and commits it only after every statement, including
//! hydration lookups, has succeeded. Any error drops the unit and rolls the
//! transaction back.

use super::{
    connection::{TaskPgPool, checkout, connect},
    lookup::TransactionLookup,
    models::{NewTaskRow, TaskChangeset, TaskLabelRow, TaskRow, row_to_record},
    schema::{tasks, tasks_labels},
    transaction::TransactionUnit,
};
use crate::config::PostgresConfig;
use crate::task::{
    domain::{LabelId, Task, TaskDraft, TaskId, UserId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
    services::hydrate_tasks,
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// `PostgreSQL`-backed task store.
pub struct PostgresTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    pool: TaskPgPool,
    clock: Arc<C>,
}

impl PostgresTaskStore {
    /// Creates a store over an existing pool, stamping tasks with the system
    /// clock.
    #[must_use]
    pub fn new(pool: TaskPgPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Connects to the database described by `config` and wraps the pool.
    ///
    /// Blocks until the liveness check completes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Connection`] when the database is unreachable.
    pub fn connect(config: &PostgresConfig) -> TaskStoreResult<Self> {
        connect(config).map(Self::new)
    }
}

impl<C> PostgresTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a store over an existing pool, stamping tasks with `clock`.
    #[must_use]
    pub const fn with_clock(pool: TaskPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    /// Returns the connection pool so its owner can release it on shutdown.
    #[must_use]
    pub const fn pool(&self) -> &TaskPgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = checkout(&pool)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::connection)?
    }
}

impl<C> Clone for PostgresTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for PostgresTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresTaskStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> TaskStore for PostgresTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn new_task(&self, draft: &TaskDraft) -> TaskStoreResult<TaskId> {
        let opened = self.clock.utc();
        let author_id = draft.author().map(UserId::into_inner);
        let assigned_id = draft.assigned().map(UserId::into_inner);
        let title = draft.title().to_owned();
        let content = draft.content().to_owned();
        let label_ids: Vec<i64> = draft.labels().iter().map(|id| id.into_inner()).collect();

        self.run_blocking(move |connection| {
            let mut unit = TransactionUnit::begin(connection)?;

            let new_row = NewTaskRow {
                opened,
                author_id,
                assigned_id,
                title: &title,
                content: &content,
            };
            let task_id = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(tasks::id)
                .get_result::<i64>(unit.connection())
                .map_err(TaskStoreError::query)?;

            let associations: Vec<TaskLabelRow> = label_ids
                .iter()
                .map(|label_id| TaskLabelRow {
                    task_id,
                    label_id: *label_id,
                })
                .collect();
            if !associations.is_empty() {
                diesel::insert_into(tasks_labels::table)
                    .values(&associations)
                    .execute(unit.connection())
                    .map_err(TaskStoreError::query)?;
            }

            unit.commit()?;
            debug!(task_id, labels = associations.len(), "created task");
            Ok(TaskId::new(task_id))
        })
        .await
    }

    async fn get_tasks(&self, author: Option<UserId>) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut unit = TransactionUnit::begin(connection)?;

            let rows = match author {
                Some(author_id) => tasks::table
                    .filter(tasks::author_id.eq(author_id.into_inner()))
                    .select(TaskRow::as_select())
                    .order(tasks::id.asc())
                    .load::<TaskRow>(unit.connection()),
                None => tasks::table
                    .select(TaskRow::as_select())
                    .order(tasks::id.asc())
                    .load::<TaskRow>(unit.connection()),
            }
            .map_err(TaskStoreError::query)?;

            let found = hydrate_rows(rows, &mut unit)?;
            unit.commit()?;
            debug!(author = ?author.map(UserId::into_inner), count = found.len(), "loaded tasks");
            Ok(found)
        })
        .await
    }

    async fn get_tasks_by_label(&self, label: LabelId) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut unit = TransactionUnit::begin(connection)?;

            let task_ids = tasks_labels::table
                .filter(tasks_labels::label_id.eq(label.into_inner()))
                .select(tasks_labels::task_id)
                .order(tasks_labels::task_id.asc())
                .load::<i64>(unit.connection())
                .map_err(TaskStoreError::query)?;

            let mut rows_by_id: HashMap<i64, TaskRow> = if task_ids.is_empty() {
                HashMap::new()
            } else {
                tasks::table
                    .filter(tasks::id.eq_any(task_ids.clone()))
                    .select(TaskRow::as_select())
                    .load::<TaskRow>(unit.connection())
                    .map_err(TaskStoreError::query)?
                    .into_iter()
                    .map(|row| (row.id, row))
                    .collect()
            };
            let rows = task_ids
                .iter()
                .filter_map(|task_id| rows_by_id.remove(task_id))
                .collect();

            let found = hydrate_rows(rows, &mut unit)?;
            unit.commit()?;
            debug!(label = label.into_inner(), count = found.len(), "loaded tasks by label");
            Ok(found)
        })
        .await
    }

    async fn update_task(&self, task: &Task) -> TaskStoreResult<()> {
        let task_id = task.id().into_inner();
        let author_id = task.author_id().map(UserId::into_inner);
        let assigned_id = task.assigned_id().map(UserId::into_inner);
        let title = task.title().to_owned();
        let content = task.content().to_owned();

        self.run_blocking(move |connection| {
            let mut unit = TransactionUnit::begin(connection)?;

            let changes = TaskChangeset {
                author_id,
                assigned_id,
                title: &title,
                content: &content,
            };
            let affected = diesel::update(tasks::table.find(task_id))
                .set(&changes)
                .execute(unit.connection())
                .map_err(TaskStoreError::query)?;

            unit.commit()?;
            debug!(task_id, affected, "updated task");
            Ok(())
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()> {
        let task_id = id.into_inner();

        self.run_blocking(move |connection| {
            let mut unit = TransactionUnit::begin(connection)?;

            let associations =
                diesel::delete(tasks_labels::table.filter(tasks_labels::task_id.eq(task_id)))
                    .execute(unit.connection())
                    .map_err(TaskStoreError::query)?;
            let affected = diesel::delete(tasks::table.find(task_id))
                .execute(unit.connection())
                .map_err(TaskStoreError::query)?;

            unit.commit()?;
            debug!(task_id, associations, affected, "deleted task");
            Ok(())
        })
        .await
    }
}

fn hydrate_rows(rows: Vec<TaskRow>, unit: &mut TransactionUnit<'_>) -> TaskStoreResult<Vec<Task>> {
    let records = rows.into_iter().map(row_to_record).collect();
    hydrate_tasks(records, &mut TransactionLookup::new(unit))
}
