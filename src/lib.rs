//! Tasktracker: relational storage for tasks, their users and labels.
//!
//! The crate maps an in-memory task aggregate, which embeds its author,
//! assignee and labels, onto normalized `PostgreSQL` tables. Every store
//! operation runs in a single transaction that is rolled back unless the whole
//! operation succeeds.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Task, user and label values with no infrastructure
//!   dependencies
//! - **Ports**: The [`task::ports::TaskStore`] contract and the lookup seam
//!   used for hydration
//! - **Adapters**: `PostgreSQL` (Diesel with an r2d2 pool) and in-memory
//!   implementations
//!
//! # Modules
//!
//! - [`config`]: Connection settings read from the environment
//! - [`task`]: Task storage

pub mod config;
pub mod task;
