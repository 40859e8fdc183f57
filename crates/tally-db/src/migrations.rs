//! # Schema Migrations
//!
//! `CREATE TABLE IF NOT EXISTS` statements for both dialects.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  tally migrate                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  products          CREATE TABLE IF NOT EXISTS                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  invoice_headers   CREATE TABLE IF NOT EXISTS                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  invoice_items     CREATE TABLE IF NOT EXISTS  (FK → both above)       │
//! │                                                                         │
//! │  Running it again is a no-op: existing tables are left untouched.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Additive only. There is no version table and no down-migration; a table
//! that already exists is never altered.

use tracing::info;

use crate::error::DbResult;
use crate::service::Services;

/// MySQL DDL.
pub mod mysql {
    pub const PRODUCTS: &str = r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGINT UNSIGNED AUTO_INCREMENT NOT NULL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            observations VARCHAR(100),
            price INT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT now(),
            updated_at TIMESTAMP NULL
        )
    "#;

    pub const INVOICE_HEADERS: &str = r#"
        CREATE TABLE IF NOT EXISTS invoice_headers (
            id BIGINT UNSIGNED AUTO_INCREMENT NOT NULL PRIMARY KEY,
            client VARCHAR(100) NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT now(),
            updated_at TIMESTAMP NULL
        )
    "#;

    pub const INVOICE_ITEMS: &str = r#"
        CREATE TABLE IF NOT EXISTS invoice_items (
            id BIGINT UNSIGNED AUTO_INCREMENT NOT NULL PRIMARY KEY,
            invoice_header_id BIGINT UNSIGNED NOT NULL,
            product_id BIGINT UNSIGNED NOT NULL,
            CONSTRAINT invoice_items_invoice_header_id_fk
                FOREIGN KEY (invoice_header_id)
                REFERENCES invoice_headers (id)
                ON UPDATE RESTRICT
                ON DELETE RESTRICT,
            CONSTRAINT invoice_items_product_id_fk
                FOREIGN KEY (product_id)
                REFERENCES products (id)
                ON UPDATE RESTRICT
                ON DELETE RESTRICT
        )
    "#;
}

/// PostgreSQL DDL.
pub mod postgres {
    pub const PRODUCTS: &str = r#"
        CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL NOT NULL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            observations VARCHAR(100),
            price INT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ
        )
    "#;

    pub const INVOICE_HEADERS: &str = r#"
        CREATE TABLE IF NOT EXISTS invoice_headers (
            id BIGSERIAL NOT NULL PRIMARY KEY,
            client VARCHAR(100) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ
        )
    "#;

    pub const INVOICE_ITEMS: &str = r#"
        CREATE TABLE IF NOT EXISTS invoice_items (
            id BIGSERIAL NOT NULL PRIMARY KEY,
            invoice_header_id BIGINT NOT NULL,
            product_id BIGINT NOT NULL,
            CONSTRAINT invoice_items_invoice_header_id_fk
                FOREIGN KEY (invoice_header_id)
                REFERENCES invoice_headers (id)
                ON UPDATE RESTRICT
                ON DELETE RESTRICT,
            CONSTRAINT invoice_items_product_id_fk
                FOREIGN KEY (product_id)
                REFERENCES products (id)
                ON UPDATE RESTRICT
                ON DELETE RESTRICT
        )
    "#;
}

/// Creates every table in foreign-key order.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Ordered: referenced tables are created before `invoice_items`
///
/// ## Example
/// ```rust,ignore
/// let services = Services::new(&Storage::new(&db));
/// migrations::run_migrations(&services).await?;
/// ```
pub async fn run_migrations(services: &Services) -> DbResult<()> {
    info!("Creating tables if missing");

    services.products.migrate().await?;
    services.invoice_headers.migrate().await?;
    services.invoice_items.migrate().await?;

    info!("All tables present");
    Ok(())
}
