//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  MySQL / PostgreSQL error (sqlx::Error)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError::Database (this module) ← carried verbatim, source kept       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Service layer ← may add DbError::Validation before any query          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller branches on is_not_found() / constraint_kind()                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::error::ErrorKind;
use tally_core::{RecordId, ValidationError};
use thiserror::Error;

use crate::config::ConfigError;

/// Database operation errors.
///
/// Only `NotFound` and `Validation` are expected in normal operation; the
/// rest are either fatal at startup or a driver failure the caller cannot
/// fix locally.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `get_by_id` matched no row
    /// - `update` / `delete` affected zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: RecordId },

    /// Input rejected by the service layer. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Configuration could not be resolved (unknown driver, missing value).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Opening or pinging the database at startup failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// The id cannot be represented by the backend's signed key column.
    #[error("Id {0} is out of range for this backend")]
    IdOutOfRange(RecordId),

    /// Any other driver error: constraint violations, syntax errors,
    /// dropped connections, failed commits.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: &'static str, id: RecordId) -> Self {
        DbError::NotFound { entity, id }
    }

    /// Whether this is the distinguished "no matching row" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// Whether the service layer rejected the input.
    pub fn is_validation(&self) -> bool {
        matches!(self, DbError::Validation(_))
    }

    /// Constraint category reported by the driver, if this is a database
    /// error at all.
    pub fn constraint_kind(&self) -> Option<ErrorKind> {
        match self {
            DbError::Database(sqlx::Error::Database(db_err)) => Some(db_err.kind()),
            _ => None,
        }
    }

    /// Shortcut for the FK RESTRICT rules on `invoice_items`.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self.constraint_kind(), Some(ErrorKind::ForeignKeyViolation))
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
