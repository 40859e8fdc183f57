//! # tally-db: Database Layer for Tally
//!
//! Product and invoice persistence over MySQL or PostgreSQL, chosen at
//! startup. All SQL is executed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  tally CLI action (create, transaction, ...)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Services    │    │    Storage    │    │   Database   │  │   │
//! │  │   │ (service/)    │───►│ (resolver.rs) │───►│  (pool.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ validation    │    │ *Store impls  │    │ MySqlPool or │  │   │
//! │  │   │ timestamps    │    │ coordinator   │    │ PgPool       │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             MySQL  or  PostgreSQL (one per process)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Driver selection and connection settings from the environment
//! - [`pool`] - Connection pool bootstrap
//! - [`migrations`] - `CREATE TABLE IF NOT EXISTS` DDL per dialect
//! - [`store`] - Record store contracts and MySQL / PostgreSQL implementations
//! - [`coordinator`] - Atomic header + items insert
//! - [`resolver`] - Store selection for the open backend
//! - [`service`] - Validation and timestamps in front of the stores
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig, Services, Storage};
//!
//! let config = DbConfig::from_env()?;
//! let db = Database::connect(&config).await?;
//! let services = Services::new(&Storage::new(&db));
//!
//! services.migrate_all().await?;
//! let products = services.products.get_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod coordinator;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod resolver;
pub mod service;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DbConfig, Driver};
pub use coordinator::SqlInvoiceCoordinator;
pub use error::{DbError, DbResult};
pub use pool::Database;
pub use resolver::Storage;
pub use service::{
    InvoiceHeaderService, InvoiceItemService, InvoiceService, ProductService, Services,
};
pub use store::{
    HeaderParticipant, InvoiceHeaderStore, InvoiceItemStore, InvoiceStore, ItemParticipant,
    ProductStore,
};
