//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  └── ValidationError  - Input rejected before reaching storage         │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  ├── ConfigError      - Unknown driver, missing env value              │
//! │  └── DbError          - Not found, driver errors, wraps the above      │
//! │                                                                         │
//! │  Flow: ValidationError → DbError → CLI (anyhow) → stderr               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the service layer before any database round-trip, so a caller
/// receiving one of these knows nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The entity has no identifier yet (id is zero).
    ///
    /// ## When This Occurs
    /// - `ProductService::update` called on a product that was never created
    #[error("{entity} does not have an id")]
    MissingId { entity: String },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long for its column.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    /// Creates a MissingId error for the given entity name.
    pub fn missing_id(entity: impl Into<String>) -> Self {
        ValidationError::MissingId {
            entity: entity.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
