//! # MySQL Product Store

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::Row;
use tally_core::{Product, RecordId};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::store::ProductStore;

const SELECT_PRODUCTS: &str = r#"
    SELECT id, name, observations, price, created_at, updated_at
    FROM products
"#;

/// Product store backed by MySQL.
#[derive(Debug, Clone)]
pub struct MySqlProductStore {
    pool: MySqlPool,
}

impl MySqlProductStore {
    /// Creates a new MySqlProductStore.
    pub fn new(pool: MySqlPool) -> Self {
        MySqlProductStore { pool }
    }
}

fn product_from_row(row: &MySqlRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        observations: row.try_get("observations")?,
        price: row.try_get("price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProductStore for MySqlProductStore {
    async fn migrate(&self) -> DbResult<()> {
        sqlx::query(migrations::mysql::PRODUCTS)
            .execute(&self.pool)
            .await?;

        info!(table = "products", "Table migrated");
        Ok(())
    }

    async fn create(&self, product: &mut Product) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, observations, price, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(product.observations.as_deref())
        .bind(product.price)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        product.id = result.last_insert_id();

        debug!(id = product.id, name = %product.name, "Inserted product");
        Ok(())
    }

    async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?,
                observations = ?,
                price = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.observations.as_deref())
        .bind(product.price)
        .bind(product.updated_at)
        .bind(product.id)
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
        let row = sqlx::query(&format!("{SELECT_PRODUCTS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DbError::not_found("Product", id))?;

        Ok(product_from_row(&row)?)
    }

    async fn delete(&self, id: RecordId) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}
