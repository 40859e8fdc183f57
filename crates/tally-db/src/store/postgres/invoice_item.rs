//! # PostgreSQL Invoice Item Store

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Executor, Postgres, Row, Transaction};
use tally_core::{InvoiceItem, RecordId};
use tracing::{debug, info};

use super::{from_pg_id, lookup_key, to_pg_id};
use crate::error::DbResult;
use crate::migrations;
use crate::store::{InvoiceItemStore, ItemParticipant};

/// Invoice item store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgInvoiceItemStore {
    pool: PgPool,
}

impl PgInvoiceItemStore {
    pub fn new(pool: PgPool) -> Self {
        PgInvoiceItemStore { pool }
    }
}

async fn insert_item<'e, E>(executor: E, item: &mut InvoiceItem) -> DbResult<()>
where
    E: Executor<'e, Database = Postgres>,
{
    let header_id = to_pg_id(item.invoice_header_id)?;
    let product_id = to_pg_id(item.product_id)?;

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO invoice_items (invoice_header_id, product_id)
        VALUES ($1, $2)
        RETURNING id
        "#,
    )
    .bind(header_id)
    .bind(product_id)
    .fetch_one(executor)
    .await?;

    item.id = from_pg_id(id);

    debug!(
        id = item.id,
        header_id = item.invoice_header_id,
        product_id = item.product_id,
        "Inserted invoice item"
    );
    Ok(())
}

#[async_trait]
impl InvoiceItemStore for PgInvoiceItemStore {
    async fn migrate(&self) -> DbResult<()> {
        sqlx::query(migrations::postgres::INVOICE_ITEMS)
            .execute(&self.pool)
            .await?;

        info!(table = "invoice_items", "Table migrated");
        Ok(())
    }

    async fn create(&self, item: &mut InvoiceItem) -> DbResult<()> {
        insert_item(&self.pool, item).await
    }

    async fn get_by_header(&self, header_id: RecordId) -> DbResult<Vec<InvoiceItem>> {
        let Ok(key) = lookup_key("InvoiceHeader", header_id) else {
            return Ok(Vec::new());
        };

        let rows = sqlx::query(
            r#"
            SELECT id, invoice_header_id, product_id
            FROM invoice_items
            WHERE invoice_header_id = $1
            ORDER BY id
            "#,
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> DbResult<InvoiceItem> {
                Ok(InvoiceItem {
                    id: from_pg_id(row.try_get("id")?),
                    invoice_header_id: from_pg_id(row.try_get("invoice_header_id")?),
                    product_id: from_pg_id(row.try_get("product_id")?),
                })
            })
            .collect()
    }
}

#[async_trait]
impl ItemParticipant<Postgres> for PgInvoiceItemStore {
    async fn create_many_within_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        header_id: RecordId,
        items: &mut [InvoiceItem],
    ) -> DbResult<()> {
        for item in items.iter_mut() {
            item.invoice_header_id = header_id;
            insert_item(&mut **tx, item).await?;
        }
        Ok(())
    }
}
