//! Storage port for task persistence, lookup and removal.

use crate::task::domain::{LabelId, Task, TaskDraft, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Every operation is atomic: an error means nothing the call attempted
/// became durable. Implementations perform no retries.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Creates a task together with its label associations.
    ///
    /// The store assigns the identifier and stamps the opening time. Either
    /// the task row and every label association persist, or none of them do.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Query`] when an insert fails, for example
    /// because a label or user does not exist.
    async fn new_task(&self, draft: &TaskDraft) -> TaskStoreResult<TaskId>;

    /// Returns tasks authored by `author`, or every task when `author` is
    /// `None`.
    ///
    /// No match yields an empty collection.
    async fn get_tasks(&self, author: Option<UserId>) -> TaskStoreResult<Vec<Task>>;

    /// Returns every task carrying the label `label`.
    async fn get_tasks_by_label(&self, label: LabelId) -> TaskStoreResult<Vec<Task>>;

    /// Writes the author, assignee, title and content of `task`.
    ///
    /// The opening and closing timestamps and the label associations are left
    /// untouched. Updating a task that does not exist succeeds without effect.
    async fn update_task(&self, task: &Task) -> TaskStoreResult<()>;

    /// Removes a task and its label associations.
    ///
    /// Deleting a task that does not exist succeeds without effect.
    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The database could not be reached, or a connection could not be
    /// checked out of the pool.
    #[error("connection error: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),

    /// Beginning or committing a transaction failed.
    #[error("transaction error: {0}")]
    Transaction(Arc<dyn std::error::Error + Send + Sync>),

    /// A statement or a row scan failed.
    #[error("query error: {0}")]
    Query(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a connection failure.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }

    /// Wraps a transaction failure.
    pub fn transaction(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transaction(Arc::new(err))
    }

    /// Wraps a statement failure.
    pub fn query(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Query(Arc::new(err))
    }

    /// Returns `true` for connection failures.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` for statement failures.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}
