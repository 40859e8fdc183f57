//! # Product Service

use std::sync::Arc;

use chrono::Utc;
use tally_core::validation::{require_id, validate_product_name};
use tally_core::{Product, RecordId};
use tracing::debug;

use crate::error::DbResult;
use crate::store::ProductStore;

/// Product operations with validation and timestamp stamping.
///
/// ## Rules
/// - `create` validates the name and stamps `created_at`
/// - `update` requires an id, validates the name and stamps `updated_at`
/// - reads and deletes pass straight through
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        ProductService { store }
    }

    pub async fn migrate(&self) -> DbResult<()> {
        self.store.migrate().await
    }

    /// Inserts the product; `product.id` holds the new id afterwards.
    pub async fn create(&self, product: &mut Product) -> DbResult<()> {
        validate_product_name(&product.name)?;
        product.created_at = Utc::now();

        self.store.create(product).await
    }

    /// Overwrites the stored row with `product`.
    ///
    /// An unsaved product (id 0) or an invalid name is rejected before the
    /// store is called. `product.updated_at` only changes once the store
    /// accepted the row.
    pub async fn update(&self, product: &mut Product) -> DbResult<()> {
        require_id("product", product.id)?;
        validate_product_name(&product.name)?;

        let stamped = Product {
            updated_at: Some(Utc::now()),
            ..product.clone()
        };

        debug!(id = stamped.id, "Updating product");
        self.store.update(&stamped).await?;

        product.updated_at = stamped.updated_at;
        Ok(())
    }

    pub async fn get_all(&self) -> DbResult<Vec<Product>> {
        self.store.get_all().await
    }

    pub async fn get_by_id(&self, id: RecordId) -> DbResult<Product> {
        self.store.get_by_id(id).await
    }

    pub async fn delete(&self, id: RecordId) -> DbResult<()> {
        self.store.delete(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tally_core::{ValidationError, UNASSIGNED_ID};

    use crate::error::DbError;

    /// Keeps products in memory and records every call.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<&'static str>>,
        rows: Mutex<Vec<Product>>,
    }

    impl RecordingStore {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProductStore for RecordingStore {
        async fn migrate(&self) -> DbResult<()> {
            self.record("migrate");
            Ok(())
        }

        async fn create(&self, product: &mut Product) -> DbResult<()> {
            self.record("create");
            let mut rows = self.rows.lock().unwrap();
            product.id = rows.len() as RecordId + 1;
            rows.push(product.clone());
            Ok(())
        }

        async fn update(&self, product: &Product) -> DbResult<()> {
            self.record("update");
            let mut rows = self.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|row| row.id == product.id)
                .ok_or(DbError::not_found("Product", product.id))?;
            *row = product.clone();
            Ok(())
        }

        async fn get_all(&self) -> DbResult<Vec<Product>> {
            self.record("get_all");
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn get_by_id(&self, id: RecordId) -> DbResult<Product> {
            self.record("get_by_id");
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|row| row.id == id)
                .cloned()
                .ok_or(DbError::not_found("Product", id))
        }

        async fn delete(&self, id: RecordId) -> DbResult<()> {
            self.record("delete");
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|row| row.id != id);
            if rows.len() == before {
                return Err(DbError::not_found("Product", id));
            }
            Ok(())
        }
    }

    fn service() -> (ProductService, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::default());
        (ProductService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_create_stamps_created_at_and_assigns_id() {
        let (service, store) = service();
        let before = Utc::now();

        let mut product = Product::new("Java Course", 56).with_observations("On fire");
        service.create(&mut product).await.unwrap();

        assert_eq!(product.id, 1);
        assert!(product.created_at >= before);
        assert!(product.updated_at.is_none());
        assert_eq!(store.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (service, store) = service();

        let mut product = Product::new("  ", 10);
        let err = service.create(&mut product).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(product.id, UNASSIGNED_ID);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_without_id_never_reaches_store() {
        let (service, store) = service();

        let mut product = Product::new("Java Course", 56);
        let err = service.update(&mut product).await.unwrap_err();

        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MissingId { .. })
        ));
        assert_eq!(err.to_string(), "product does not have an id");
        assert!(product.updated_at.is_none());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at() {
        let (service, store) = service();

        let mut product = Product::new("Java Course", 56);
        service.create(&mut product).await.unwrap();

        product.name = "Go Course".to_string();
        product.price = 70;
        service.update(&mut product).await.unwrap();
        assert!(product.updated_at.is_some());

        let stored = service.get_by_id(product.id).await.unwrap();
        assert_eq!(stored.name, "Go Course");
        assert_eq!(stored.price, 70);
        assert!(stored.updated_at.is_some());
        assert_eq!(store.calls(), vec!["create", "update", "get_by_id"]);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let (service, store) = service();

        let mut product = Product::new("Java Course", 56);
        product.id = 42;

        let err = service.update(&mut product).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(product.updated_at.is_none());
        assert_eq!(store.calls(), vec!["update"]);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_name() {
        let (service, store) = service();

        let mut product = Product::new("Java Course", 56);
        service.create(&mut product).await.unwrap();

        product.name = String::new();
        let err = service.update(&mut product).await.unwrap_err();

        assert!(err.is_validation());
        assert!(product.updated_at.is_none());
        assert_eq!(store.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_propagates() {
        let (service, _store) = service();

        let err = service.get_by_id(7).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::NotFound {
                entity: "Product",
                id: 7
            }
        ));
    }

    #[tokio::test]
    async fn test_delete_then_list() {
        let (service, _store) = service();

        let mut first = Product::new("Java Course", 56);
        let mut second = Product::new("Rust Course", 80);
        service.create(&mut first).await.unwrap();
        service.create(&mut second).await.unwrap();

        service.delete(first.id).await.unwrap();
        assert!(service.delete(first.id).await.unwrap_err().is_not_found());

        let remaining = service.get_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Rust Course");
    }
}
