//! # MySQL Invoice Header Store

use async_trait::async_trait;
use sqlx::mysql::MySqlPool;
use sqlx::{Executor, MySql, Row, Transaction};
use tally_core::{InvoiceHeader, RecordId};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::store::{HeaderParticipant, InvoiceHeaderStore};

/// Invoice header store backed by MySQL.
///
/// Serves both as the standalone [`InvoiceHeaderStore`] and as the
/// [`HeaderParticipant`] the invoice coordinator drives.
#[derive(Debug, Clone)]
pub struct MySqlInvoiceHeaderStore {
    pool: MySqlPool,
}

impl MySqlInvoiceHeaderStore {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlInvoiceHeaderStore { pool }
    }
}

/// Runs the insert on whichever executor it is given (pool or transaction).
async fn insert_header<'e, E>(executor: E, header: &mut InvoiceHeader) -> DbResult<()>
where
    E: Executor<'e, Database = MySql>,
{
    let result = sqlx::query("INSERT INTO invoice_headers (client) VALUES (?)")
        .bind(&header.client)
        .execute(executor)
        .await?;

    header.id = result.last_insert_id();

    debug!(id = header.id, client = %header.client, "Inserted invoice header");
    Ok(())
}

#[async_trait]
impl InvoiceHeaderStore for MySqlInvoiceHeaderStore {
    async fn migrate(&self) -> DbResult<()> {
        sqlx::query(migrations::mysql::INVOICE_HEADERS)
            .execute(&self.pool)
            .await?;

        info!(table = "invoice_headers", "Table migrated");
        Ok(())
    }

    async fn create(&self, header: &mut InvoiceHeader) -> DbResult<()> {
        insert_header(&self.pool, header).await
    }

    async fn get_by_id(&self, id: RecordId) -> DbResult<InvoiceHeader> {
        let row = sqlx::query(
            r#"
            SELECT id, client, created_at, updated_at
            FROM invoice_headers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::not_found("InvoiceHeader", id))?;

        Ok(InvoiceHeader {
            id: row.try_get("id")?,
            client: row.try_get("client")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl HeaderParticipant<MySql> for MySqlInvoiceHeaderStore {
    async fn create_within_transaction(
        &self,
        tx: &mut Transaction<'_, MySql>,
        header: &mut InvoiceHeader,
    ) -> DbResult<()> {
        insert_header(&mut **tx, header).await
    }
}
