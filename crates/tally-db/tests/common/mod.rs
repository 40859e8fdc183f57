//! Scenarios shared by the MySQL and PostgreSQL integration tests.
//!
//! Each backend file connects with its own URL variable and hands the
//! resulting [`Services`] to these functions. Tests run in parallel against
//! one database, so every scenario works only on rows it created itself.

#![allow(dead_code)]

use std::time::Duration;

use tally_core::{Invoice, InvoiceHeader, InvoiceItem, Product, RecordId, UNASSIGNED_ID};
use tally_db::{Database, DbError, Services, Storage};
use tokio::sync::OnceCell;
use uuid::Uuid;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// No product can have this id.
pub const MISSING_PRODUCT: RecordId = 9_000_000_000;

/// Builds services for an open pool and makes sure the tables exist.
///
/// Table creation runs once per test binary so parallel tests do not race
/// on `CREATE TABLE`.
pub async fn services_for(db: Database, migrated: &'static OnceCell<()>) -> Services {
    let services = Services::new(&Storage::new(&db));
    migrated
        .get_or_try_init(|| async { services.migrate_all().await })
        .await
        .expect("migrations failed");
    services
}

pub fn skip(var: &str, reason: &str) {
    eprintln!("skipping: {var} {reason}");
}

fn unique_client() -> String {
    format!("client-{}", Uuid::new_v4())
}

async fn new_product(services: &Services, name: &str) -> Product {
    let mut product = Product::new(name, 10);
    services.products.create(&mut product).await.unwrap();
    product
}

pub async fn migrate_is_idempotent(services: &Services) {
    services.migrate_all().await.unwrap();
    services.migrate_all().await.unwrap();
}

pub async fn product_lifecycle(services: &Services) {
    let mut product = Product::new("Java Course", 56).with_observations("On fire");
    services.products.create(&mut product).await.unwrap();
    assert_ne!(product.id, UNASSIGNED_ID);

    let stored = services.products.get_by_id(product.id).await.unwrap();
    assert_eq!(stored.name, "Java Course");
    assert_eq!(stored.price, 56);
    assert_eq!(stored.observations.as_deref(), Some("On fire"));
    assert!(stored.updated_at.is_none());

    let mut changed = stored.clone();
    changed.name = "Go Course".to_string();
    changed.observations = None;
    services.products.update(&mut changed).await.unwrap();

    let stored = services.products.get_by_id(product.id).await.unwrap();
    assert_eq!(stored.name, "Go Course");
    assert!(stored.observations.is_none());
    assert!(stored.updated_at.is_some());

    let listed = services.products.get_all().await.unwrap();
    assert!(listed.iter().any(|p| p.id == product.id));
    assert!(listed.windows(2).all(|w| w[0].id < w[1].id));

    services.products.delete(product.id).await.unwrap();
    let err = services.products.get_by_id(product.id).await.unwrap_err();
    assert!(err.is_not_found());
}

pub async fn missing_rows_are_not_found(services: &Services) {
    let err = services
        .products
        .get_by_id(MISSING_PRODUCT)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { .. }));

    assert!(services
        .products
        .delete(MISSING_PRODUCT)
        .await
        .unwrap_err()
        .is_not_found());

    let mut ghost = Product::new("Ghost", 1);
    ghost.id = MISSING_PRODUCT;
    assert!(services
        .products
        .update(&mut ghost)
        .await
        .unwrap_err()
        .is_not_found());
}

pub async fn invoice_commits(services: &Services) {
    let first = new_product(services, "Python Course").await;
    let second = new_product(services, "Rust Course").await;
    let client = unique_client();

    let mut invoice = Invoice::new(
        InvoiceHeader::new(&client),
        vec![InvoiceItem::new(first.id), InvoiceItem::new(second.id)],
    );
    services.invoices.create(&mut invoice).await.unwrap();

    let header_id = invoice.header.id;
    assert_ne!(header_id, UNASSIGNED_ID);
    assert!(invoice
        .items
        .iter()
        .all(|item| item.id != UNASSIGNED_ID && item.invoice_header_id == header_id));

    let header = services.invoice_headers.get_by_id(header_id).await.unwrap();
    assert_eq!(header.client, client);
    assert!(header.created_at.is_some());

    let items = services
        .invoice_items
        .get_by_header(header_id)
        .await
        .unwrap();
    let product_ids: Vec<RecordId> = items.iter().map(|item| item.product_id).collect();
    assert_eq!(product_ids, vec![first.id, second.id]);
}

pub async fn invoice_rolls_back_on_foreign_key_violation(services: &Services) {
    let first = new_product(services, "Python Course").await;
    let third = new_product(services, "Rust Course").await;

    let mut invoice = Invoice::new(
        InvoiceHeader::new(unique_client()),
        vec![
            InvoiceItem::new(first.id),
            InvoiceItem::new(MISSING_PRODUCT),
            InvoiceItem::new(third.id),
        ],
    );

    let err = services.invoices.create(&mut invoice).await.unwrap_err();
    assert!(err.is_foreign_key_violation(), "unexpected error: {err}");

    assert_eq!(invoice.header.id, UNASSIGNED_ID);
    assert!(invoice.items.iter().all(|item| item.id == UNASSIGNED_ID));

    // The first item went in before the failure; the rollback removed it.
    // Deleting the product only succeeds if no item row references it.
    services.products.delete(first.id).await.unwrap();
    services.products.delete(third.id).await.unwrap();
}

pub async fn standalone_header_and_item(services: &Services) {
    let product = new_product(services, "Java Course").await;

    let mut header = InvoiceHeader::new(unique_client());
    services.invoice_headers.create(&mut header).await.unwrap();
    assert!(header.is_persisted());

    let mut item = InvoiceItem::new(product.id);
    item.invoice_header_id = header.id;
    services.invoice_items.create(&mut item).await.unwrap();
    assert_ne!(item.id, UNASSIGNED_ID);

    let items = services
        .invoice_items
        .get_by_header(header.id)
        .await
        .unwrap();
    assert_eq!(items, vec![item]);
}
