use std::sync::Arc;

use tally_core::{InvoiceHeader, RecordId};

use crate::error::DbResult;
use crate::store::InvoiceHeaderStore;

/// Invoice header operations outside of an invoice transaction.
#[derive(Clone)]
pub struct InvoiceHeaderService {
    store: Arc<dyn InvoiceHeaderStore>,
}

impl InvoiceHeaderService {
    pub fn new(store: Arc<dyn InvoiceHeaderStore>) -> Self {
        InvoiceHeaderService { store }
    }

    pub async fn migrate(&self) -> DbResult<()> {
        self.store.migrate().await
    }

    pub async fn create(&self, header: &mut InvoiceHeader) -> DbResult<()> {
        self.store.create(header).await
    }

    pub async fn get_by_id(&self, id: RecordId) -> DbResult<InvoiceHeader> {
        self.store.get_by_id(id).await
    }
}
