//! # Service Layer
//!
//! Thin wrappers over the record stores. Validation and timestamps live
//! here; SQL does not.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLI action                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductService        validate name, stamp created_at / updated_at    │
//! │  InvoiceHeaderService  pass-through                                    │
//! │  InvoiceItemService    pass-through                                    │
//! │  InvoiceService        pass-through to the invoice coordinator         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<dyn *Store> resolved by Storage::new                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod invoice;
mod invoice_header;
mod invoice_item;
mod product;

pub use invoice::InvoiceService;
pub use invoice_header::InvoiceHeaderService;
pub use invoice_item::InvoiceItemService;
pub use product::ProductService;

use crate::error::DbResult;
use crate::migrations;
use crate::resolver::Storage;

/// All services, wired to one [`Storage`] bundle.
#[derive(Clone)]
pub struct Services {
    pub products: ProductService,
    pub invoice_headers: InvoiceHeaderService,
    pub invoice_items: InvoiceItemService,
    pub invoices: InvoiceService,
}

impl Services {
    pub fn new(storage: &Storage) -> Self {
        Services {
            products: ProductService::new(storage.products.clone()),
            invoice_headers: InvoiceHeaderService::new(storage.invoice_headers.clone()),
            invoice_items: InvoiceItemService::new(storage.invoice_items.clone()),
            invoices: InvoiceService::new(storage.invoices.clone()),
        }
    }

    /// Creates every table, referenced tables first.
    pub async fn migrate_all(&self) -> DbResult<()> {
        migrations::run_migrations(self).await
    }
}
