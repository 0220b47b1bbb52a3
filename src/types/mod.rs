//! Row, schema and value types.

mod column;
mod factory;
mod record;
mod row;
mod schema;
mod slot_row;
mod value;

pub use column::{ColumnDescription, TypeCode};
pub use factory::{make_row_type, RowType};
pub use record::Record;
pub use row::{Row, RowView};
pub(crate) use row::clamp_range;
pub use schema::FieldSchema;
pub use slot_row::SlotRow;
pub use value::{Slot, Value};
