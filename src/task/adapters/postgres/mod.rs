//! `PostgreSQL` adapters for task storage.

mod connection;
mod lookup;
mod models;
mod repository;
mod schema;
mod transaction;

pub use connection::{TaskPgConnection, TaskPgPool, connect, ping};
pub use repository::PostgresTaskStore;
pub use transaction::TransactionUnit;
