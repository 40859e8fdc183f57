//! # PostgreSQL Invoice Header Store

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Executor, Postgres, Row, Transaction};
use tally_core::{InvoiceHeader, RecordId};
use tracing::{debug, info};

use super::{from_pg_id, lookup_key};
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::store::{HeaderParticipant, InvoiceHeaderStore};

/// Invoice header store backed by PostgreSQL.
///
/// Serves both as the standalone [`InvoiceHeaderStore`] and as the
/// [`HeaderParticipant`] the invoice coordinator drives.
#[derive(Debug, Clone)]
pub struct PgInvoiceHeaderStore {
    pool: PgPool,
}

impl PgInvoiceHeaderStore {
    pub fn new(pool: PgPool) -> Self {
        PgInvoiceHeaderStore { pool }
    }
}

/// Runs the insert on whichever executor it is given (pool or transaction).
async fn insert_header<'e, E>(executor: E, header: &mut InvoiceHeader) -> DbResult<()>
where
    E: Executor<'e, Database = Postgres>,
{
    let id: i64 = sqlx::query_scalar("INSERT INTO invoice_headers (client) VALUES ($1) RETURNING id")
        .bind(&header.client)
        .fetch_one(executor)
        .await?;

    header.id = from_pg_id(id);

    debug!(id = header.id, client = %header.client, "Inserted invoice header");
    Ok(())
}

#[async_trait]
impl InvoiceHeaderStore for PgInvoiceHeaderStore {
    async fn migrate(&self) -> DbResult<()> {
        sqlx::query(migrations::postgres::INVOICE_HEADERS)
            .execute(&self.pool)
            .await?;

        info!(table = "invoice_headers", "Table migrated");
        Ok(())
    }

    async fn create(&self, header: &mut InvoiceHeader) -> DbResult<()> {
        insert_header(&self.pool, header).await
    }

    async fn get_by_id(&self, id: RecordId) -> DbResult<InvoiceHeader> {
        let key = lookup_key("InvoiceHeader", id)?;

        let row = sqlx::query(
            r#"
            SELECT id, client, created_at, updated_at
            FROM invoice_headers
            WHERE id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(DbError::not_found("InvoiceHeader", id))?;

        Ok(InvoiceHeader {
            id: from_pg_id(row.try_get("id")?),
            client: row.try_get("client")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl HeaderParticipant<Postgres> for PgInvoiceHeaderStore {
    async fn create_within_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        header: &mut InvoiceHeader,
    ) -> DbResult<()> {
        insert_header(&mut **tx, header).await
    }
}
