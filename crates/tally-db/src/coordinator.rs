//! # Invoice Coordinator
//!
//! Writes an invoice header and all of its items as one transaction.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   InvoiceStore::create(&mut invoice)                    │
//! │                                                                         │
//! │  pool.begin() ──── error ──► return (nothing attempted)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HeaderParticipant::create_within_transaction(tx, header)              │
//! │       │  error ──► rollback (error logged, not returned) ──► return    │
//! │       ▼                                                                 │
//! │  header.id is now set                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ItemParticipant::create_many_within_transaction(tx, header.id, items) │
//! │       │  error ──► rollback (error logged, not returned) ──► return    │
//! │       ▼                                                                 │
//! │  tx.commit() ──► its result is the result of create                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Either one header row and every item row become visible, or none do.
//! The transaction never outlives a single `create` call.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Database, Pool, Transaction};
use tally_core::Invoice;
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::store::{HeaderParticipant, InvoiceStore, ItemParticipant};

/// Owns begin / commit / rollback for invoice writes on one dialect.
///
/// ## Usage
/// ```rust,ignore
/// let headers = Arc::new(PgInvoiceHeaderStore::new(pool.clone()));
/// let items = Arc::new(PgInvoiceItemStore::new(pool.clone()));
/// let invoices = SqlInvoiceCoordinator::new(pool, headers, items);
///
/// invoices.create(&mut invoice).await?;
/// ```
pub struct SqlInvoiceCoordinator<DB: Database> {
    pool: Pool<DB>,
    headers: Arc<dyn HeaderParticipant<DB>>,
    items: Arc<dyn ItemParticipant<DB>>,
}

impl<DB: Database> SqlInvoiceCoordinator<DB> {
    pub fn new(
        pool: Pool<DB>,
        headers: Arc<dyn HeaderParticipant<DB>>,
        items: Arc<dyn ItemParticipant<DB>>,
    ) -> Self {
        SqlInvoiceCoordinator {
            pool,
            headers,
            items,
        }
    }
}

/// Best-effort cleanup after a failed phase.
///
/// The caller already holds the error that caused the rollback; a second
/// failure here is only logged so it cannot replace that root cause.
async fn rollback<DB: Database>(tx: Transaction<'static, DB>, invoice: &mut Invoice) {
    if let Err(err) = tx.rollback().await {
        warn!(error = %err, "Invoice rollback failed");
    }
    invoice.reset_ids();
}

#[async_trait]
impl<DB: Database> InvoiceStore for SqlInvoiceCoordinator<DB> {
    async fn create(&self, invoice: &mut Invoice) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        if let Err(err) = self
            .headers
            .create_within_transaction(&mut tx, &mut invoice.header)
            .await
        {
            debug!(error = %err, "Invoice header insert failed, rolling back");
            rollback(tx, invoice).await;
            return Err(err);
        }

        let header_id = invoice.header.id;

        if let Err(err) = self
            .items
            .create_many_within_transaction(&mut tx, header_id, &mut invoice.items)
            .await
        {
            debug!(error = %err, header_id, "Invoice item insert failed, rolling back");
            rollback(tx, invoice).await;
            return Err(err);
        }

        if let Err(err) = tx.commit().await {
            invoice.reset_ids();
            return Err(err.into());
        }

        info!(
            header_id,
            client = %invoice.header.client,
            items = invoice.item_count(),
            "Invoice committed"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
    use sqlx::Sqlite;
    use tally_core::{InvoiceHeader, InvoiceItem, RecordId, UNASSIGNED_ID};

    use crate::error::DbError;

    const SCHEMA: &[&str] = &[
        "CREATE TABLE products (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL)",
        "CREATE TABLE invoice_headers (id INTEGER PRIMARY KEY AUTOINCREMENT, client TEXT NOT NULL)",
        r#"CREATE TABLE invoice_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            invoice_header_id INTEGER NOT NULL REFERENCES invoice_headers (id) ON DELETE RESTRICT,
            product_id INTEGER NOT NULL REFERENCES products (id) ON DELETE RESTRICT
        )"#,
        "INSERT INTO products (name) VALUES ('Java Course'), ('Python Course'), ('Rust Course')",
    ];

    async fn test_pool() -> SqlitePool {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);

        // In-memory databases are per connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
        pool
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    struct SqliteHeaders {
        fail: bool,
    }

    #[async_trait]
    impl HeaderParticipant<Sqlite> for SqliteHeaders {
        async fn create_within_transaction(
            &self,
            tx: &mut Transaction<'_, Sqlite>,
            header: &mut InvoiceHeader,
        ) -> DbResult<()> {
            let sql = if self.fail {
                "INSERT INTO missing_table (client) VALUES (?)"
            } else {
                "INSERT INTO invoice_headers (client) VALUES (?)"
            };
            let result = sqlx::query(sql)
                .bind(&header.client)
                .execute(&mut **tx)
                .await?;
            header.id = result.last_insert_rowid() as RecordId;
            Ok(())
        }
    }

    /// Inserts items for real; optionally fails with an injected error once
    /// `fail_after` items have gone in.
    struct SqliteItems {
        fail_after: Option<usize>,
        calls: AtomicUsize,
    }

    impl SqliteItems {
        fn new(fail_after: Option<usize>) -> Self {
            SqliteItems {
                fail_after,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ItemParticipant<Sqlite> for SqliteItems {
        async fn create_many_within_transaction(
            &self,
            tx: &mut Transaction<'_, Sqlite>,
            header_id: RecordId,
            items: &mut [InvoiceItem],
        ) -> DbResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for (index, item) in items.iter_mut().enumerate() {
                if self.fail_after == Some(index) {
                    return Err(DbError::Database(sqlx::Error::Protocol(
                        "injected item failure".to_string(),
                    )));
                }
                item.invoice_header_id = header_id;
                let result = sqlx::query(
                    "INSERT INTO invoice_items (invoice_header_id, product_id) VALUES (?, ?)",
                )
                .bind(header_id as i64)
                .bind(item.product_id as i64)
                .execute(&mut **tx)
                .await?;
                item.id = result.last_insert_rowid() as RecordId;
            }
            Ok(())
        }
    }

    fn coordinator(
        pool: &SqlitePool,
        headers: SqliteHeaders,
        items: Arc<SqliteItems>,
    ) -> SqlInvoiceCoordinator<Sqlite> {
        SqlInvoiceCoordinator::new(pool.clone(), Arc::new(headers), items)
    }

    fn invoice(product_ids: &[RecordId]) -> Invoice {
        Invoice::new(
            InvoiceHeader::new("Ignacio"),
            product_ids.iter().copied().map(InvoiceItem::new).collect(),
        )
    }

    #[tokio::test]
    async fn test_commit_writes_header_and_items() {
        let pool = test_pool().await;
        let items = Arc::new(SqliteItems::new(None));
        let invoices = coordinator(&pool, SqliteHeaders { fail: false }, items);

        let mut invoice = invoice(&[2, 3]);
        invoices.create(&mut invoice).await.unwrap();

        assert!(invoice.header.is_persisted());
        assert_eq!(count(&pool, "invoice_headers").await, 1);
        assert_eq!(count(&pool, "invoice_items").await, 2);

        let header_refs: Vec<i64> = sqlx::query_scalar(
            "SELECT invoice_header_id FROM invoice_items ORDER BY id",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert!(header_refs
            .iter()
            .all(|id| *id as RecordId == invoice.header.id));
    }

    #[tokio::test]
    async fn test_ids_written_back_in_call_order() {
        let pool = test_pool().await;
        let items = Arc::new(SqliteItems::new(None));
        let invoices = coordinator(&pool, SqliteHeaders { fail: false }, items);

        let mut invoice = invoice(&[3, 1, 2]);
        invoices.create(&mut invoice).await.unwrap();

        let stored: Vec<(i64, i64)> =
            sqlx::query_as("SELECT id, product_id FROM invoice_items ORDER BY id")
                .fetch_all(&pool)
                .await
                .unwrap();

        // Item i received the i-th id assigned, and that row holds item i's product.
        for (item, (row_id, product_id)) in invoice.items.iter().zip(stored) {
            assert_eq!(item.id, row_id as RecordId);
            assert_eq!(item.product_id, product_id as RecordId);
            assert_eq!(item.invoice_header_id, invoice.header.id);
        }
        assert!(invoice.items.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_invoice_without_items() {
        let pool = test_pool().await;
        let items = Arc::new(SqliteItems::new(None));
        let invoices = coordinator(&pool, SqliteHeaders { fail: false }, items);

        let mut invoice = invoice(&[]);
        invoices.create(&mut invoice).await.unwrap();

        assert_ne!(invoice.header.id, UNASSIGNED_ID);
        assert_eq!(count(&pool, "invoice_headers").await, 1);
        assert_eq!(count(&pool, "invoice_items").await, 0);
    }

    #[tokio::test]
    async fn test_fault_after_first_item_rolls_back_everything() {
        let pool = test_pool().await;
        let items = Arc::new(SqliteItems::new(Some(1)));
        let invoices = coordinator(&pool, SqliteHeaders { fail: false }, items);

        let mut invoice = invoice(&[1, 2, 3]);
        let err = invoices.create(&mut invoice).await.unwrap_err();

        assert!(err.to_string().contains("injected item failure"));
        assert_eq!(count(&pool, "invoice_headers").await, 0);
        assert_eq!(count(&pool, "invoice_items").await, 0);
        // Write-back undone: nothing in the aggregate points at a discarded row.
        assert_eq!(invoice.header.id, UNASSIGNED_ID);
        assert!(invoice.items.iter().all(|item| item.id == UNASSIGNED_ID));
    }

    #[tokio::test]
    async fn test_foreign_key_violation_rolls_back_everything() {
        let pool = test_pool().await;
        let items = Arc::new(SqliteItems::new(None));
        let invoices = coordinator(&pool, SqliteHeaders { fail: false }, items);

        // Item 2 of 3 references a product that does not exist.
        let mut invoice = invoice(&[1, 999, 3]);
        let err = invoices.create(&mut invoice).await.unwrap_err();

        assert!(matches!(err, DbError::Database(_)));
        assert_eq!(count(&pool, "invoice_headers").await, 0);
        assert_eq!(count(&pool, "invoice_items").await, 0);
    }

    #[tokio::test]
    async fn test_header_failure_skips_items() {
        let pool = test_pool().await;
        let items = Arc::new(SqliteItems::new(None));
        let invoices = coordinator(&pool, SqliteHeaders { fail: true }, Arc::clone(&items));

        let mut invoice = invoice(&[2, 3]);
        assert!(invoices.create(&mut invoice).await.is_err());

        assert_eq!(items.calls.load(Ordering::SeqCst), 0);
        assert_eq!(count(&pool, "invoice_headers").await, 0);
        assert_eq!(count(&pool, "invoice_items").await, 0);
    }

    #[tokio::test]
    async fn test_begin_failure_attempts_nothing() {
        let pool = test_pool().await;
        let items = Arc::new(SqliteItems::new(None));
        let invoices = coordinator(&pool, SqliteHeaders { fail: false }, Arc::clone(&items));
        pool.close().await;

        let mut invoice = invoice(&[2]);
        let err = invoices.create(&mut invoice).await.unwrap_err();

        assert!(matches!(err, DbError::Database(sqlx::Error::PoolClosed)));
        assert_eq!(items.calls.load(Ordering::SeqCst), 0);
        assert_eq!(invoice.header.id, UNASSIGNED_ID);
    }

    #[tokio::test]
    async fn test_later_invoices_unaffected_by_rollback() {
        let pool = test_pool().await;
        let failing = coordinator(
            &pool,
            SqliteHeaders { fail: false },
            Arc::new(SqliteItems::new(Some(0))),
        );
        let working = coordinator(
            &pool,
            SqliteHeaders { fail: false },
            Arc::new(SqliteItems::new(None)),
        );

        let mut first = invoice(&[1]);
        assert!(failing.create(&mut first).await.is_err());

        let mut second = invoice(&[2, 3]);
        working.create(&mut second).await.unwrap();

        assert_eq!(count(&pool, "invoice_headers").await, 1);
        assert_eq!(count(&pool, "invoice_items").await, 2);
    }
}
