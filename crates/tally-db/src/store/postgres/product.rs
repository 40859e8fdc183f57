//! # PostgreSQL Product Store

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tally_core::{Product, RecordId};
use tracing::{debug, info};

use super::{from_pg_id, lookup_key};
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::store::ProductStore;

const SELECT_PRODUCTS: &str = r#"
    SELECT id, name, observations, price, created_at, updated_at
    FROM products
"#;

/// Product store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// Creates a new PgProductStore.
    pub fn new(pool: PgPool) -> Self {
        PgProductStore { pool }
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: from_pg_id(row.try_get("id")?),
        name: row.try_get("name")?,
        observations: row.try_get("observations")?,
        price: row.try_get("price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn migrate(&self) -> DbResult<()> {
        sqlx::query(migrations::postgres::PRODUCTS)
            .execute(&self.pool)
            .await?;

        info!(table = "products", "Table migrated");
        Ok(())
    }

    async fn create(&self, product: &mut Product) -> DbResult<()> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, observations, price, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(product.observations.as_deref())
        .bind(product.price)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await?;

        product.id = from_pg_id(id);

        debug!(id = product.id, name = %product.name, "Inserted product");
        Ok(())
    }

    async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, "Updating product");

        let key = lookup_key("Product", product.id)?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = $1,
                observations = $2,
                price = $3,
                updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&product.name)
        .bind(product.observations.as_deref())
        .bind(product.price)
        .bind(product.updated_at)
        .bind(key)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    async fn get_all(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query(&format!("{SELECT_PRODUCTS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;

        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    async fn get_by_id(&self, id: RecordId) -> DbResult<Product> {
        let key = lookup_key("Product", id)?;

        let row = sqlx::query(&format!("{SELECT_PRODUCTS} WHERE id = $1"))
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::not_found("Product", id))?;

        Ok(product_from_row(&row)?)
    }

    async fn delete(&self, id: RecordId) -> DbResult<()> {
        debug!(id, "Deleting product");

        let key = lookup_key("Product", id)?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}
