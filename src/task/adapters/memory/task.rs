//! In-memory task store for service and behaviour tests.
//!
//! Mirrors the referential rules of the relational schema: tasks may only
//! reference seeded users and labels, and a label may be attached to a task
//! once. Creation validates every reference before touching state, which
//! gives the same all-or-nothing outcome as a rolled back transaction.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::debug;

use crate::task::{
    domain::{Label, LabelId, Task, TaskDraft, TaskId, TaskRecord, User, UserId},
    ports::{ReferenceLookup, TaskStore, TaskStoreError, TaskStoreResult},
    services::hydrate_tasks,
};

/// Referential violations detected by [`InMemoryTaskStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// The referenced user has not been seeded.
    #[error("user {0} does not exist")]
    UnknownUser(UserId),

    /// The referenced label has not been seeded.
    #[error("label {0} does not exist")]
    UnknownLabel(LabelId),

    /// The same label was supplied twice for one task.
    #[error("label {label} is already attached to task {task}")]
    DuplicateLabel {
        /// Task receiving the association.
        task: TaskId,
        /// Label supplied more than once.
        label: LabelId,
    },
}

/// Thread-safe in-memory task store.
pub struct InMemoryTaskStore<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<C>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    next_id: i64,
    users: HashMap<UserId, String>,
    labels: HashMap<LabelId, String>,
    tasks: BTreeMap<TaskId, TaskRecord>,
    associations: BTreeSet<(TaskId, LabelId)>,
}

impl<C> Clone for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl InMemoryTaskStore {
    /// Creates an empty store stamping tasks with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping tasks with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
        }
    }

    /// Registers a user that tasks may reference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Connection`] when the state lock is poisoned.
    pub fn seed_user(&self, user: User) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state.users.insert(user.id(), user.name().to_owned());
        Ok(())
    }

    /// Registers a label that tasks may carry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Connection`] when the state lock is poisoned.
    pub fn seed_label(&self, label: Label) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state.labels.insert(label.id(), label.name().to_owned());
        Ok(())
    }

    /// Returns the number of label associations held for `task`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Connection`] when the state lock is poisoned.
    pub fn association_count(&self, task: TaskId) -> TaskStoreResult<usize> {
        let state = self.read()?;
        Ok(state
            .associations
            .iter()
            .filter(|(task_id, _)| *task_id == task)
            .count())
    }

    fn read(&self) -> TaskStoreResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskStoreError::connection(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskStoreResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskStoreError::connection(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryTaskState {
    fn check_user(&self, id: Option<UserId>) -> Result<(), ReferenceError> {
        match id {
            Some(user_id) if !self.users.contains_key(&user_id) => {
                Err(ReferenceError::UnknownUser(user_id))
            }
            _ => Ok(()),
        }
    }

    fn check_labels(&self, task: TaskId, labels: &[LabelId]) -> Result<(), ReferenceError> {
        let mut seen = HashSet::with_capacity(labels.len());
        for label in labels {
            if !self.labels.contains_key(label) {
                return Err(ReferenceError::UnknownLabel(*label));
            }
            if !seen.insert(*label) {
                return Err(ReferenceError::DuplicateLabel {
                    task,
                    label: *label,
                });
            }
        }
        Ok(())
    }
}

/// Resolves references against the store's directories.
struct StateLookup<'a> {
    state: &'a InMemoryTaskState,
}

impl ReferenceLookup for StateLookup<'_> {
    fn user_name(&mut self, id: UserId) -> TaskStoreResult<String> {
        self.state
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| TaskStoreError::query(ReferenceError::UnknownUser(id)))
    }

    fn task_labels(&mut self, id: TaskId) -> TaskStoreResult<Vec<Label>> {
        self.state
            .associations
            .range((id, LabelId::new(i64::MIN))..=(id, LabelId::new(i64::MAX)))
            .map(|(_, label_id)| {
                self.state
                    .labels
                    .get(label_id)
                    .map(|name| Label::new(*label_id, name.clone()))
                    .ok_or_else(|| TaskStoreError::query(ReferenceError::UnknownLabel(*label_id)))
            })
            .collect()
    }
}

#[async_trait]
impl<C> TaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn new_task(&self, draft: &TaskDraft) -> TaskStoreResult<TaskId> {
        let opened = self.clock.utc();
        let mut state = self.write()?;
        let id = TaskId::new(state.next_id + 1);

        state.check_user(draft.author()).map_err(TaskStoreError::query)?;
        state.check_user(draft.assigned()).map_err(TaskStoreError::query)?;
        state
            .check_labels(id, draft.labels())
            .map_err(TaskStoreError::query)?;

        state.next_id = id.into_inner();
        state.tasks.insert(
            id,
            TaskRecord {
                id,
                opened,
                closed: None,
                author_id: draft.author(),
                assigned_id: draft.assigned(),
                title: draft.title().to_owned(),
                content: draft.content().to_owned(),
            },
        );
        for label in draft.labels() {
            state.associations.insert((id, *label));
        }

        debug!(task_id = %id, labels = draft.labels().len(), "created task in memory");
        Ok(id)
    }

    async fn get_tasks(&self, author: Option<UserId>) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        let records = state
            .tasks
            .values()
            .filter(|record| author.is_none() || record.author_id == author)
            .cloned()
            .collect();
        hydrate_tasks(records, &mut StateLookup { state: &state })
    }

    async fn get_tasks_by_label(&self, label: LabelId) -> TaskStoreResult<Vec<Task>> {
        let state = self.read()?;
        let records = state
            .associations
            .iter()
            .filter(|(_, label_id)| *label_id == label)
            .filter_map(|(task_id, _)| state.tasks.get(task_id).cloned())
            .collect();
        hydrate_tasks(records, &mut StateLookup { state: &state })
    }

    async fn update_task(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id()) {
            debug!(task_id = %task.id(), "update matched no task");
            return Ok(());
        }
        state
            .check_user(task.author_id())
            .map_err(TaskStoreError::query)?;
        state
            .check_user(task.assigned_id())
            .map_err(TaskStoreError::query)?;

        let Some(record) = state.tasks.get_mut(&task.id()) else {
            return Ok(());
        };
        record.author_id = task.author_id();
        record.assigned_id = task.assigned_id();
        task.title().clone_into(&mut record.title);
        task.content().clone_into(&mut record.content);
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.write()?;
        state.associations.retain(|(task_id, _)| *task_id != id);
        state.tasks.remove(&id);
        Ok(())
    }
}
