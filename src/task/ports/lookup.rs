//! Resolver port used to hydrate task records.

use super::TaskStoreResult;
use crate::task::domain::{Label, TaskId, UserId};

/// Resolves foreign keys of a task record into embedded values.
///
/// Implementations run inside the caller's unit of work, so a lookup failure
/// aborts the whole operation.
#[cfg_attr(test, mockall::automock)]
pub trait ReferenceLookup {
    /// Returns the name of user `id`.
    ///
    /// # Errors
    ///
    /// Fails when the user does not exist or the lookup itself fails.
    fn user_name(&mut self, id: UserId) -> TaskStoreResult<String>;

    /// Returns the labels attached to task `id`, ordered by label ID.
    ///
    /// # Errors
    ///
    /// Fails when the lookup itself fails.
    fn task_labels(&mut self, id: TaskId) -> TaskStoreResult<Vec<Label>>;
}
