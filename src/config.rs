//! Database configuration for the task store.
//!
//! Values come from the `PG_*` environment variables. The binary loads a
//! `.env` file first, so local overrides work without exporting anything.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the database host.
pub const ENV_HOST: &str = "PG_HOST";
/// Environment variable holding the database port.
pub const ENV_PORT: &str = "PG_PORT";
/// Environment variable holding the database user.
pub const ENV_USER: &str = "PG_USER";
/// Environment variable holding the database password.
pub const ENV_PASSWORD: &str = "PG_PASS";
/// Environment variable holding the database name.
pub const ENV_DATABASE: &str = "PG_DATABASE";
/// Optional environment variable overriding the pool size.
pub const ENV_MAX_CONNECTIONS: &str = "PG_MAX_CONNECTIONS";

/// Errors raised while reading configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing configuration value {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value '{value}' for {key}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Connection settings for the `PostgreSQL` task store.
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    host: String,
    port: u16,
    user: String,
    password: String,
    database: String,
    max_connections: u32,
    connection_timeout: Duration,
}

impl PostgresConfig {
    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets how long connection checkout may wait, including the startup ping.
    #[must_use]
    pub const fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, keyed by the `PG_*` names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required key is missing or a numeric
    /// value does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let port_raw = required(ENV_PORT)?;
        let port = port_raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
            key: ENV_PORT,
            value: port_raw.clone(),
        })?;

        let config = Self::new(
            required(ENV_HOST)?,
            port,
            required(ENV_USER)?,
            required(ENV_PASSWORD)?,
            required(ENV_DATABASE)?,
        );

        match lookup(ENV_MAX_CONNECTIONS) {
            None => Ok(config),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(max) if max > 0 => Ok(config.with_max_connections(max)),
                _ => Err(ConfigError::Invalid {
                    key: ENV_MAX_CONNECTIONS,
                    value: raw,
                }),
            },
        }
    }

    /// Returns the database host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the database port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the database name.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the maximum number of pooled connections.
    #[must_use]
    pub const fn max_connections(&self) -> u32 {
        self.max_connections
    }

    /// Returns the connection checkout timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Renders the connection string. TLS is disabled.
    ///
    /// User, password and database name are percent-encoded; IPv6 host
    /// literals are bracketed.
    #[must_use]
    pub fn database_url(&self) -> String {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode=disable",
            urlencoding::encode(&self.user),
            urlencoding::encode(&self.password),
            host,
            self.port,
            urlencoding::encode(&self.database),
        )
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}
