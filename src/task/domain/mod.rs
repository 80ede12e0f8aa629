//! Domain model for task storage.
//!
//! The task aggregate embeds its author, assignee and labels. Persistence
//! keeps them normalized, so the domain also carries the row-shaped
//! [`TaskRecord`] used by the hydration mapper.

mod ids;
mod task;
mod user;

pub use ids::{LabelId, TaskId, UserId};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskRecord};
pub use user::{Label, User};
