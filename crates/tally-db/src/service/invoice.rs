use std::sync::Arc;

use tally_core::Invoice;

use crate::error::DbResult;
use crate::store::InvoiceStore;

/// Atomic invoice creation.
#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>) -> Self {
        InvoiceService { store }
    }

    /// Writes the header and every item, or nothing.
    ///
    /// On success all ids on `invoice` are assigned. On failure they are all
    /// back to 0 and no row from this call is visible.
    pub async fn create(&self, invoice: &mut Invoice) -> DbResult<()> {
        self.store.create(invoice).await
    }
}
