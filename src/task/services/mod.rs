//! Services shared by task store adapters.

pub mod hydration;

pub use hydration::{hydrate_task, hydrate_tasks};
