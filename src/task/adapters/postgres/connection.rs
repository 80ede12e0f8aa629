//! Connection provider: builds the pooled `PostgreSQL` handle for the store.

use crate::config::PostgresConfig;
use crate::task::ports::{TaskStoreError, TaskStoreResult};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use tracing::info;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Pooled connection checked out for a single store operation.
pub type TaskPgConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Builds a connection pool from `config` and verifies the database answers.
///
/// This blocks until the pool has its initial connections and a liveness
/// query has succeeded, or until the configured timeout elapses. The caller
/// owns the returned pool; dropping the last handle closes its connections.
///
/// # Errors
///
/// Returns [`TaskStoreError::Connection`] when the pool cannot be built or
/// the liveness query fails.
pub fn connect(config: &PostgresConfig) -> TaskStoreResult<TaskPgPool> {
    let manager = ConnectionManager::<PgConnection>::new(config.database_url());
    let pool = Pool::builder()
        .max_size(config.max_connections())
        .connection_timeout(config.connection_timeout())
        .build(manager)
        .map_err(TaskStoreError::connection)?;

    ping(&pool)?;
    info!(
        host = config.host(),
        port = config.port(),
        database = config.database(),
        max_connections = config.max_connections(),
        "connected to PostgreSQL"
    );
    Ok(pool)
}

/// Runs a trivial query on a pooled connection.
///
/// # Errors
///
/// Returns [`TaskStoreError::Connection`] when no connection can be checked
/// out or the query fails.
pub fn ping(pool: &TaskPgPool) -> TaskStoreResult<()> {
    let mut connection = checkout(pool)?;
    diesel::sql_query("SELECT 1")
        .execute(&mut connection)
        .map_err(TaskStoreError::connection)?;
    Ok(())
}

pub(super) fn checkout(pool: &TaskPgPool) -> TaskStoreResult<TaskPgConnection> {
    pool.get().map_err(TaskStoreError::connection)
}
