//! Task aggregate and the normalized shapes it is mapped to and from.

use super::{Label, LabelId, TaskId, User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task aggregate as seen by callers of the store.
///
/// Author, assignee and labels are embedded, denormalized values. They are
/// persisted as foreign keys and resolved again on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    opened: DateTime<Utc>,
    closed: Option<DateTime<Utc>>,
    author: Option<User>,
    assigned: Option<User>,
    title: String,
    content: String,
    labels: Vec<Label>,
}

/// Parameter object for reconstructing a hydrated task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Opening timestamp.
    pub opened: DateTime<Utc>,
    /// Closing timestamp, `None` while the task is open.
    pub closed: Option<DateTime<Utc>>,
    /// Resolved author, if one is set.
    pub author: Option<User>,
    /// Resolved assignee, if one is set.
    pub assigned: Option<User>,
    /// Task title.
    pub title: String,
    /// Task body.
    pub content: String,
    /// Resolved labels.
    pub labels: Vec<Label>,
}

/// Normalized task row: references are foreign keys, labels live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: TaskId,
    /// Opening timestamp.
    pub opened: DateTime<Utc>,
    /// Closing timestamp, `None` while the task is open.
    pub closed: Option<DateTime<Utc>>,
    /// Author key, `None` when unset.
    pub author_id: Option<UserId>,
    /// Assignee key, `None` when unset.
    pub assigned_id: Option<UserId>,
    /// Task title.
    pub title: String,
    /// Task body.
    pub content: String,
}

impl Task {
    /// Reconstructs a task from persisted, hydrated data.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            opened: data.opened,
            closed: data.closed,
            author: data.author,
            assigned: data.assigned,
            title: data.title,
            content: data.content,
            labels: data.labels,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the opening timestamp.
    #[must_use]
    pub const fn opened(&self) -> DateTime<Utc> {
        self.opened
    }

    /// Returns the closing timestamp; `None` means the task is open.
    #[must_use]
    pub const fn closed(&self) -> Option<DateTime<Utc>> {
        self.closed
    }

    /// Returns `true` while no closing timestamp is recorded.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.closed.is_none()
    }

    /// Returns the author, if set.
    #[must_use]
    pub const fn author(&self) -> Option<&User> {
        self.author.as_ref()
    }

    /// Returns the author key, if set.
    #[must_use]
    pub fn author_id(&self) -> Option<UserId> {
        self.author.as_ref().map(User::id)
    }

    /// Returns the assignee, if set.
    #[must_use]
    pub const fn assigned(&self) -> Option<&User> {
        self.assigned.as_ref()
    }

    /// Returns the assignee key, if set.
    #[must_use]
    pub fn assigned_id(&self) -> Option<UserId> {
        self.assigned.as_ref().map(User::id)
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the attached labels.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns `true` when a label with `id` is attached.
    #[must_use]
    pub fn has_label(&self, id: LabelId) -> bool {
        self.labels.iter().any(|label| label.id() == id)
    }

    /// Replaces the author. Only the user ID is persisted.
    pub fn set_author(&mut self, author: Option<User>) {
        self.author = author;
    }

    /// Replaces the assignee. Only the user ID is persisted.
    pub fn set_assigned(&mut self, assigned: Option<User>) {
        self.assigned = assigned;
    }

    /// Replaces the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the body.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Maps the aggregate back to its normalized row shape.
    #[must_use]
    pub fn record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            opened: self.opened,
            closed: self.closed,
            author_id: self.author_id(),
            assigned_id: self.assigned_id(),
            title: self.title.clone(),
            content: self.content.clone(),
        }
    }
}

/// Input for creating a task. The store assigns the ID and opening time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    author: Option<UserId>,
    assigned: Option<UserId>,
    title: String,
    content: String,
    labels: Vec<LabelId>,
}

impl TaskDraft {
    /// Creates a draft with a title and body and no references.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Sets the author.
    #[must_use]
    pub fn with_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assigned(mut self, assigned: UserId) -> Self {
        self.assigned = Some(assigned);
        self
    }

    /// Sets the labels to attach, in order.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = LabelId>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Returns the author key, if set.
    #[must_use]
    pub const fn author(&self) -> Option<UserId> {
        self.author
    }

    /// Returns the assignee key, if set.
    #[must_use]
    pub const fn assigned(&self) -> Option<UserId> {
        self.assigned
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the label keys to attach.
    #[must_use]
    pub fn labels(&self) -> &[LabelId] {
        &self.labels
    }
}
