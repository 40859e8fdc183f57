//! # MySQL Invoice Item Store

use async_trait::async_trait;
use sqlx::mysql::MySqlPool;
use sqlx::{Executor, MySql, Row, Transaction};
use tally_core::{InvoiceItem, RecordId};
use tracing::{debug, info};

use crate::error::DbResult;
use crate::migrations;
use crate::store::{InvoiceItemStore, ItemParticipant};

/// Invoice item store backed by MySQL.
#[derive(Debug, Clone)]
pub struct MySqlInvoiceItemStore {
    pool: MySqlPool,
}

impl MySqlInvoiceItemStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlInvoiceItemStore { pool }
    }
}

async fn insert_item<'e, E>(executor: E, item: &mut InvoiceItem) -> DbResult<()>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO invoice_items (invoice_header_id, product_id)
        VALUES (?, ?)
        "#,
    )
    .bind(item.invoice_header_id)
    .bind(item.product_id)
    .execute(executor)
    .await?;

    item.id = result.last_insert_id();

    debug!(
        id = item.id,
        header_id = item.invoice_header_id,
        product_id = item.product_id,
        "Inserted invoice item"
    );
    Ok(())
}

#[async_trait]
impl InvoiceItemStore for MySqlInvoiceItemStore {
    async fn migrate(&self) -> DbResult<()> {
        sqlx::query(migrations::mysql::INVOICE_ITEMS)
            .execute(&self.pool)
            .await?;

        info!(table = "invoice_items", "Table migrated");
        Ok(())
    }

    async fn create(&self, item: &mut InvoiceItem) -> DbResult<()> {
        insert_item(&self.pool, item).await
    }

    async fn get_by_header(&self, header_id: RecordId) -> DbResult<Vec<InvoiceItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, invoice_header_id, product_id
            FROM invoice_items
            WHERE invoice_header_id = ?
            ORDER BY id
            "#,
        )
        .bind(header_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> DbResult<InvoiceItem> {
                Ok(InvoiceItem {
                    id: row.try_get("id")?,
                    invoice_header_id: row.try_get("invoice_header_id")?,
                    product_id: row.try_get("product_id")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ItemParticipant<MySql> for MySqlInvoiceItemStore {
    async fn create_many_within_transaction(
        &self,
        tx: &mut Transaction<'_, MySql>,
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
