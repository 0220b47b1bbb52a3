//! Row objects for SQL query results.
//!
//! Rows give positional, key and attribute-style access to the columns of
//! one fetched record, optionally matching field names without regard to
//! case. Row collections wrap a driver cursor and pull rows only as far as
//! callers actually read.
//!
//! # Example
//!
//! ```
//! use db_row_rs::{MemoryCursor, RowCollection, RowConfig, RowImpl, RowView, Value};
//!
//! fn main() -> db_row_rs::Result<()> {
//!     // Resolve configuration once at start-up
//!     let config = RowConfig::new()
//!         .with_row_impl(RowImpl::Records)
//!         .with_case_insensitive(true);
//!
//!     // Any driver cursor works; this one serves rows from memory
//!     let cursor = MemoryCursor::new(
//!         ["ACCOUNT_ID", "ENTITY_NAME"],
//!         vec![vec![Some(Value::from(907)), Some(Value::from("bootstrap_account"))]],
//!     );
//!
//!     let mut accounts = RowCollection::from_cursor(cursor, &config)?;
//!     if let Some(row) = accounts.one()? {
//!         println!("{:?}", row.get_attr("Entity_Name")?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod config;
pub mod cursor;
pub mod error;
pub mod memory;
pub mod types;

// Re-export main types
pub use collection::{RowCollection, RowSource};
pub use config::{RowConfig, RowImpl};
pub use cursor::{Batches, Cursor, DbCursor, RawRow, RowCursor, Single};
pub use error::{Error, Result};
pub use memory::MemoryCursor;
pub use types::{
    make_row_type, ColumnDescription, FieldSchema, Record, Row, RowType, RowView, Slot, SlotRow,
    TypeCode, Value,
};
