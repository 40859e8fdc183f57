//! MySQL record stores.
//!
//! `?` placeholders, `BIGINT UNSIGNED AUTO_INCREMENT` keys, generated ids
//! read from `LAST_INSERT_ID()` via the query result.

mod invoice_header;
mod invoice_item;
mod product;

pub use invoice_header::MySqlInvoiceHeaderStore;
pub use invoice_item::MySqlInvoiceItemStore;
pub use product::MySqlProductStore;
