//! Database configuration module.
//!
//! Configuration is loaded from environment variables (optionally via a
//! `.env` file) once at startup and then passed explicitly to
//! [`Database::connect`](crate::Database::connect).
//!
//! ## Variables
//! ```text
//! DB_DRIVER                  MYSQL | POSTGRES              (required)
//! <P>_HOST                   default: localhost
//! <P>_PORT                   u16                           (required)
//! <P>_USER                                                 (required)
//! <P>_PASSWORD                                             (required)
//! <P>_DB                     database name                 (required)
//! DB_MAX_CONNECTIONS         default: 5
//! DB_CONNECT_TIMEOUT_SECS    default: 30
//!
//! <P> is MYSQL or POSTGRES, matching DB_DRIVER.
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

// =============================================================================
// Driver
// =============================================================================

/// The two supported relational backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    MySql,
    Postgres,
}

impl Driver {
    /// Identifier used in `DB_DRIVER` and as the env variable prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::MySql => "MYSQL",
            Driver::Postgres => "POSTGRES",
        }
    }

    fn default_port(&self) -> u16 {
        match self {
            Driver::MySql => 3306,
            Driver::Postgres => 5432,
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Driver {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MYSQL" => Ok(Driver::MySql),
            "POSTGRES" | "POSTGRESQL" => Ok(Driver::Postgres),
            _ => Err(ConfigError::UnknownDriver(s.to_string())),
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Connection configuration for one backend.
///
/// ## Example
/// ```rust
/// use tally_db::{DbConfig, Driver};
///
/// let config = DbConfig::new(Driver::Postgres, "tally", "secret", "tally")
///     .host("db.internal")
///     .max_connections(10);
///
/// assert_eq!(config.port, 5432);
/// ```
#[derive(Clone)]
pub struct DbConfig {
    /// Which backend to talk to.
    pub driver: Driver,

    pub host: String,

    pub port: u16,

    pub user: String,

    pub password: String,

    /// Database (schema) name.
    pub database: String,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,
}

impl DbConfig {
    /// Creates a configuration with the driver's default host and port.
    pub fn new(
        driver: Driver,
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        DbConfig {
            driver,
            host: "localhost".to_string(),
            port: driver.default_port(),
            user: user.into(),
            password: password.into(),
            database: database.into(),
            max_connections: 5,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// [`from_env`](Self::from_env) delegates here; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let driver: Driver = lookup("DB_DRIVER")
            .ok_or_else(|| ConfigError::MissingRequired("DB_DRIVER".to_string()))?
            .parse()?;

        let prefix = driver.as_str();
        let required = |name: &str| {
            let key = format!("{prefix}_{name}");
            lookup(&key).ok_or(ConfigError::MissingRequired(key))
        };

        let port_key = format!("{prefix}_PORT");
        let port = required("PORT")?
            .parse()
            .map_err(|_| ConfigError::InvalidValue(port_key))?;

        let mut config = DbConfig::new(
            driver,
            required("USER")?,
            required("PASSWORD")?,
            required("DB")?,
        )
        .port(port);

        if let Some(host) = lookup(&format!("{prefix}_HOST")) {
            config = config.host(host);
        }

        if let Some(max) = lookup("DB_MAX_CONNECTIONS") {
            let max = max
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?;
            config = config.max_connections(max);
        }

        if let Some(secs) = lookup("DB_CONNECT_TIMEOUT_SECS") {
            let secs = secs
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_CONNECT_TIMEOUT_SECS".to_string()))?;
            config = config.connect_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

/// Password is never printed.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown database driver: {0:?} (expected MYSQL or POSTGRES)")]
    UnknownDriver(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

// =============================================================================
// Unit Tests
// =============================================================================
