//! # Database Pool Management
//!
//! Opens and verifies the connection pool for the configured backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  CLI Startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_env() ← DB_DRIVER + <P>_* variables                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::connect(&config).await ← Create pool + ping                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │   Database::MySql(MySqlPool)            │                           │
//! │  │   Database::Postgres(PgPool)            │  (exactly one)            │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Storage::new(&db) ← every store shares this one pool                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The handle is created once and passed explicitly. Cloning it clones the
//! pool handle, not the connections.

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{MySqlPool, PgPool};
use tracing::{debug, info};

use crate::config::{DbConfig, Driver};
use crate::error::{DbError, DbResult};

/// Open connection pool for one backend.
///
/// ## Usage
/// ```rust,ignore
/// let config = DbConfig::from_env()?;
/// let db = Database::connect(&config).await?;
/// let storage = Storage::new(&db);
/// ```
#[derive(Debug, Clone)]
pub enum Database {
    MySql(MySqlPool),
    Postgres(PgPool),
}

impl Database {
    /// Opens a pool and proves it usable with `SELECT 1`.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Pool is open and answered the ping
    /// * `Err(DbError::ConnectionFailed)` - The pool could not open a
    ///   connection or the ping failed
    pub async fn connect(config: &DbConfig) -> DbResult<Self> {
        info!(
            driver = %config.driver,
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Initializing database connection"
        );

        let db = match config.driver {
            Driver::MySql => {
                let options = MySqlConnectOptions::new()
                    .host(&config.host)
                    .port(config.port)
                    .username(&config.user)
                    .password(&config.password)
                    .database(&config.database);

                let pool = MySqlPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.connect_timeout)
                    .connect_with(options)
                    .await
                    .map_err(DbError::ConnectionFailed)?;

                Database::MySql(pool)
            }
            Driver::Postgres => {
                let options = PgConnectOptions::new()
                    .host(&config.host)
                    .port(config.port)
                    .username(&config.user)
                    .password(&config.password)
                    .database(&config.database)
                    .ssl_mode(PgSslMode::Disable);

                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.connect_timeout)
                    .connect_with(options)
                    .await
                    .map_err(DbError::ConnectionFailed)?;

                Database::Postgres(pool)
            }
        };

        debug!("Pool created, pinging");
        db.ping().await.map_err(DbError::ConnectionFailed)?;

        info!(
            driver = %config.driver,
            max_connections = config.max_connections,
            "Database pool ready"
        );
        Ok(db)
    }

    /// Which backend this handle talks to.
    pub fn driver(&self) -> Driver {
        match self {
            Database::MySql(_) => Driver::MySql,
            Database::Postgres(_) => Driver::Postgres,
        }
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        match self {
            Database::MySql(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
            Database::Postgres(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
        }
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        self.ping().await.is_ok()
    }

    /// Closes the pool. Every store built from this handle fails afterwards.
    pub async fn close(&self) {
        info!(driver = %self.driver(), "Closing database connection pool");
        match self {
            Database::MySql(pool) => pool.close().await,
            Database::Postgres(pool) => pool.close().await,
        }
    }
}

impl From<MySqlPool> for Database {
    fn from(pool: MySqlPool) -> Self {
        Database::MySql(pool)
    }
}

impl From<PgPool> for Database {
    fn from(pool: PgPool) -> Self {
        Database::Postgres(pool)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
