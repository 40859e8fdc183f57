//! PostgreSQL record stores.
//!
//! `$n` placeholders, `BIGSERIAL` keys, generated ids read back with
//! `RETURNING id`.
//!
//! PostgreSQL has no unsigned integers, so [`RecordId`] values are converted
//! to and from the signed `BIGINT` key columns at the boundary.

mod invoice_header;
mod invoice_item;
mod product;

pub use invoice_header::PgInvoiceHeaderStore;
pub use invoice_item::PgInvoiceItemStore;
pub use product::PgProductStore;

use tally_core::RecordId;

use crate::error::{DbError, DbResult};

/// Converts an id that is about to be written (e.g. a foreign key).
fn to_pg_id(id: RecordId) -> DbResult<i64> {
    i64::try_from(id).map_err(|_| DbError::IdOutOfRange(id))
}

/// Converts an id used to look a row up. No row can carry an id above
/// `i64::MAX`, so an out-of-range lookup is simply not found.
fn lookup_key(entity: &'static str, id: RecordId) -> DbResult<i64> {
    i64::try_from(id).map_err(|_| DbError::not_found(entity, id))
}

/// BIGSERIAL values start at 1 and only grow.
fn from_pg_id(raw: i64) -> RecordId {
    raw as RecordId
}
