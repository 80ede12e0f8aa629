//! Task storage.
//!
//! Tasks are stored normalized across `tasks`, `users`, `labels` and the
//! `tasks_labels` join table, and handed to callers as denormalized
//! aggregates. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The hydration mapper in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
