//! Port contracts for task storage.
//!
//! Ports define infrastructure-agnostic interfaces used by adapters and the
//! hydration service.

pub mod lookup;
pub mod store;

pub use lookup::ReferenceLookup;
pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
