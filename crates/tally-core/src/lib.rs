//! # tally-core: Pure Domain Types for Tally
//!
//! This crate holds the entities that the data-access layer persists, plus
//! the validation rules the service layer applies before touching storage.
//! It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally CLI (apps/cli)                        │   │
//! │  │    migrate, create, get-all, get-one, update, transaction       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    tally-db (Database Layer)                    │   │
//! │  │     services ─► record stores / invoice coordinator ─► SQL      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────────┐  ┌────────────────┐  ┌────────────────┐   │   │
//! │  │   │     types      │  │   validation   │  │     error      │   │   │
//! │  │   │ Product        │  │ require_id     │  │ ValidationError│   │   │
//! │  │   │ Invoice*       │  │ names          │  │                │   │   │
//! │  │   └────────────────┘  └────────────────┘  └────────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{Invoice, InvoiceHeader, InvoiceItem};
//!
//! let invoice = Invoice::new(
//!     InvoiceHeader::new("Ignacio"),
//!     vec![InvoiceItem::new(2), InvoiceItem::new(3)],
//! );
//!
//! assert_eq!(invoice.item_count(), 2);
//! assert!(!invoice.header.is_persisted());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Identifier value meaning "not yet assigned by the store".
pub const UNASSIGNED_ID: RecordId = 0;

/// Longest product name accepted.
///
/// Both schemas declare `products.name` as `VARCHAR(100)`.
pub const MAX_NAME_LENGTH: usize = 100;
