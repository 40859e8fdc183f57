//! # Validation Module
//!
//! Checks the service layer runs before delegating to a record store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service (Rust)                                               │
//! │  └── THIS MODULE: id presence, name length                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (MySQL / PostgreSQL)                                │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints (RESTRICT)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{require_id, validate_product_name};
//!
//! assert!(require_id("product", 0).is_err());
//! assert!(validate_product_name("Java Course").is_ok());
//! ```

use crate::error::ValidationError;
use crate::{RecordId, MAX_NAME_LENGTH, UNASSIGNED_ID};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fails with [`ValidationError::MissingId`] when `id` is unassigned.
pub fn require_id(entity: &str, id: RecordId) -> ValidationResult<()> {
    if id == UNASSIGNED_ID {
        return Err(ValidationError::missing_id(entity));
    }
    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_NAME_LENGTH`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
