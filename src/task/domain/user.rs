//! Reference entities embedded into the task aggregate.

use super::{LabelId, UserId};
use serde::{Deserialize, Serialize};

/// A user that authors or is assigned to tasks.
///
/// The task store only resolves user names; it never creates or removes users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
}

impl User {
    /// Creates a fully resolved user.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creates a reference to a user whose name has not been resolved.
    #[must_use]
    pub const fn reference(id: UserId) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the user name, empty for unresolved references.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A label attached to tasks through the `tasks_labels` join table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    id: LabelId,
    name: String,
}

impl Label {
    /// Creates a fully resolved label.
    #[must_use]
    pub fn new(id: LabelId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Creates a reference to a label whose name has not been resolved.
    #[must_use]
    pub const fn reference(id: LabelId) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }

    /// Returns the label identifier.
    #[must_use]
    pub const fn id(&self) -> LabelId {
        self.id
    }

    /// Returns the label name, empty for unresolved references.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
