use std::sync::Arc;

use tally_core::{InvoiceItem, RecordId};

use crate::error::DbResult;
use crate::store::InvoiceItemStore;

/// Invoice item operations outside of an invoice transaction.
#[derive(Clone)]
pub struct InvoiceItemService {
    store: Arc<dyn InvoiceItemStore>,
}

impl InvoiceItemService {
    pub fn new(store: Arc<dyn InvoiceItemStore>) -> Self {
        InvoiceItemService { store }
    }

    pub async fn migrate(&self) -> DbResult<()> {
        self.store.migrate().await
    }

    /// The item must already carry the `invoice_header_id` it belongs to.
    pub async fn create(&self, item: &mut InvoiceItem) -> DbResult<()> {
        self.store.create(item).await
    }

    pub async fn get_by_header(&self, header_id: RecordId) -> DbResult<Vec<InvoiceItem>> {
        self.store.get_by_header(header_id).await
    }
}
