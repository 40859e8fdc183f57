//! # Domain Types
//!
//! Entities persisted by tally-db.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  InvoiceHeader  │   │  InvoiceItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄┐ │  id             │◄──│  header_id (FK) │       │
//! │  │  name           │ └─│─────────────────│───│  product_id(FK) │       │
//! │  │  observations   │   │  client         │   │  id             │       │
//! │  │  price          │   │  created_at     │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  Invoice = InvoiceHeader + Vec<InvoiceItem>   (in memory only)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identifier Pattern
//! Every stored entity carries a [`RecordId`] assigned by the database on
//! insert. Zero means "unassigned"; stores write the generated value back
//! onto the in-memory struct after a successful insert.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UNASSIGNED_ID;

/// Database-generated row identifier. `0` means unassigned.
pub type RecordId = u64;

// =============================================================================
// Product
// =============================================================================

/// A product that invoice items can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Row identifier, assigned on insert.
    pub id: RecordId,

    /// Display name.
    pub name: String,

    /// Free-text note. Stored as NULL when absent.
    pub observations: Option<String>,

    /// Price in whole currency units.
    pub price: i32,

    /// Stamped by the service layer on create.
    pub created_at: DateTime<Utc>,

    /// Stamped by the service layer on update; `None` until first update.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Creates an unsaved product.
    pub fn new(name: impl Into<String>, price: i32) -> Self {
        Product {
            id: UNASSIGNED_ID,
            name: name.into(),
            observations: None,
            price,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Sets the free-text observations. Empty text clears them.
    pub fn with_observations(mut self, observations: impl Into<String>) -> Self {
        let observations = observations.into();
        self.observations = if observations.is_empty() {
            None
        } else {
            Some(observations)
        };
        self
    }

    /// Whether the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

/// One table row per product, used by the CLI listing.
impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let updated = self
            .updated_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        write!(
            f,
            "{:02} | {:<20} | {:<20} | {:>5} | {:>10} | {:>10}",
            self.id,
            self.name,
            self.observations.as_deref().unwrap_or(""),
            self.price,
            self.created_at.format("%Y-%m-%d"),
            updated
        )
    }
}

// =============================================================================
// Invoice Header
// =============================================================================

/// Invoice header row. Items point at it through `invoice_header_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Row identifier, assigned on insert.
    pub id: RecordId,

    /// Client the invoice is issued to.
    pub client: String,

    /// Defaulted by the database; populated when read back.
    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl InvoiceHeader {
    /// Creates an unsaved header.
    pub fn new(client: impl Into<String>) -> Self {
        InvoiceHeader {
            id: UNASSIGNED_ID,
            client: client.into(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A single line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Row identifier, assigned on insert.
    pub id: RecordId,

    /// Owning header. Filled in from the header's id before insert.
    pub invoice_header_id: RecordId,

    /// Referenced product.
    pub product_id: RecordId,
}

impl InvoiceItem {
    /// Creates an unsaved item for the given product.
    pub fn new(product_id: RecordId) -> Self {
        InvoiceItem {
            id: UNASSIGNED_ID,
            invoice_header_id: UNASSIGNED_ID,
            product_id,
        }
    }
}

// =============================================================================
// Invoice (aggregate)
// =============================================================================

/// Header plus items, written as one atomic unit.
///
/// Not a stored row. Owned by the caller until handed to the invoice
/// coordinator, which writes the generated ids back in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub header: InvoiceHeader,
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    pub fn new(header: InvoiceHeader, items: Vec<InvoiceItem>) -> Self {
        Invoice { header, items }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Clears every id written back during a failed write.
    pub fn reset_ids(&mut self) {
        self.header.id = UNASSIGNED_ID;
        for item in &mut self.items {
            item.id = UNASSIGNED_ID;
            item.invoice_header_id = UNASSIGNED_ID;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
