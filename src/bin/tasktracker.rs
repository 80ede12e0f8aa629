//! Starts the task store and reports what it holds.
//!
//! Usage:
//!
//! ```text
//! tasktracker
//! ```
//!
//! Connection settings are read from `PG_HOST`, `PG_PORT`, `PG_USER`,
//! `PG_PASS` and `PG_DATABASE` (plus the optional `PG_MAX_CONNECTIONS`),
//! after loading a `.env` file from the working directory when one exists.
//! Log verbosity follows `RUST_LOG` and defaults to `info`.
//!
//! The database must be reachable at startup; the process exits with an error
//! otherwise.

use tasktracker::config::PostgresConfig;
use tasktracker::task::adapters::postgres::PostgresTaskStore;
use tasktracker::task::ports::TaskStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing()?;

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => info!("no .env file found, using process environment"),
        Err(err) => return Err(err.into()),
    }

    if let Err(err) = run(|key| std::env::var(key).ok()).await {
        error!(error = %err, "task store startup failed");
        return Err(err);
    }
    Ok(())
}

async fn run<F>(lookup: F) -> Result<(), BoxError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = PostgresConfig::from_lookup(lookup)?;
    info!(config = ?config, "connecting to task database");

    let store = tokio::task::spawn_blocking(move || PostgresTaskStore::connect(&config)).await??;

    let tasks = store.get_tasks(None).await?;
    let open = tasks.iter().filter(|task| task.is_open()).count();
    info!(total = tasks.len(), open, "task store ready");

    // Dropping the last store handle closes the pooled connections.
    drop(store);
    Ok(())
}

fn init_tracing() -> Result<(), BoxError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init()?;
    Ok(())
}
