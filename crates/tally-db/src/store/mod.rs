//! # Record Stores
//!
//! Per-entity persistence contracts and their dialect implementations.
//!
//! ## Store Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stores and Participants                              │
//! │                                                                         │
//! │  ProductStore          migrate / create / update / get / list / delete │
//! │  InvoiceHeaderStore    migrate / create / get_by_id                    │
//! │  InvoiceItemStore      migrate / create / get_by_header                │
//! │                                                                         │
//! │  HeaderParticipant<DB> create_within_transaction                       │
//! │  ItemParticipant<DB>   create_many_within_transaction                  │
//! │       ▲                                                                 │
//! │       │ same struct implements both the store and the participant      │
//! │       │                                                                 │
//! │  mysql::*      (MySql)       postgres::*   (Postgres)                  │
//! │                                                                         │
//! │  InvoiceStore          create(&mut Invoice)  ← the coordinator         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stores never retry and never swallow errors. Participants never commit or
//! roll back: the transaction belongs to whoever passed it in.

use async_trait::async_trait;
use sqlx::{Database, Transaction};
use tally_core::{Invoice, InvoiceHeader, InvoiceItem, Product, RecordId};

use crate::error::DbResult;

pub mod mysql;
pub mod postgres;

/// Product persistence.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Creates the `products` table if it does not exist.
    async fn migrate(&self) -> DbResult<()>;

    /// Inserts the product and writes the generated id back onto it.
    async fn create(&self, product: &mut Product) -> DbResult<()>;

    /// Overwrites every column of the row with `product.id`.
    ///
    /// Fails with `NotFound` when no row has that id.
    async fn update(&self, product: &Product) -> DbResult<()>;

    /// All products ordered by id.
    async fn get_all(&self) -> DbResult<Vec<Product>>;

    /// Fails with `NotFound` when no row has that id.
    async fn get_by_id(&self, id: RecordId) -> DbResult<Product>;

    /// Fails with `NotFound` when no row has that id.
    async fn delete(&self, id: RecordId) -> DbResult<()>;
}

/// Invoice header persistence outside of an invoice transaction.
#[async_trait]
pub trait InvoiceHeaderStore: Send + Sync {
    async fn migrate(&self) -> DbResult<()>;

    /// Inserts on its own connection (autocommit) and writes the id back.
    async fn create(&self, header: &mut InvoiceHeader) -> DbResult<()>;

    async fn get_by_id(&self, id: RecordId) -> DbResult<InvoiceHeader>;
}

/// Invoice item persistence outside of an invoice transaction.
#[async_trait]
pub trait InvoiceItemStore: Send + Sync {
    async fn migrate(&self) -> DbResult<()>;

    /// Inserts using the item's own `invoice_header_id` and writes the id back.
    async fn create(&self, item: &mut InvoiceItem) -> DbResult<()>;

    /// Items of one header ordered by id.
    async fn get_by_header(&self, header_id: RecordId) -> DbResult<Vec<InvoiceItem>>;
}

/// A header store that can insert inside a caller-owned transaction.
#[async_trait]
pub trait HeaderParticipant<DB: Database>: Send + Sync {
    /// Inserts the header through `tx` and writes the generated id back.
    async fn create_within_transaction(
        &self,
        tx: &mut Transaction<'_, DB>,
        header: &mut InvoiceHeader,
    ) -> DbResult<()>;
}

/// An item store that can insert inside a caller-owned transaction.
#[async_trait]
pub trait ItemParticipant<DB: Database>: Send + Sync {
    /// Inserts `items` in slice order through `tx`.
    ///
    /// Each item gets `invoice_header_id = header_id` before its insert and
    /// its generated id written back after. Stops at the first error.
    async fn create_many_within_transaction(
        &self,
        tx: &mut Transaction<'_, DB>,
        header_id: RecordId,
        items: &mut [InvoiceItem],
    ) -> DbResult<()>;
}

/// Atomic invoice persistence (header + items).
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn create(&self, invoice: &mut Invoice) -> DbResult<()>;
}
