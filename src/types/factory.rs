//! Row types: a validated schema bound to a row implementation.

use std::sync::Arc;

use crate::config::{RowConfig, RowImpl};
use crate::error::Result;

use super::column::ColumnDescription;
use super::record::Record;
use super::row::Row;
use super::schema::FieldSchema;
use super::slot_row::{fill_slots, SlotRow};
use super::value::Slot;

/// Build a slot-array row type for `fields`.
///
/// ```
/// use db_row_rs::{make_row_type, RowView, Value};
///
/// let row_type = make_row_type(["a", "b", "c"], true).unwrap();
/// let row = row_type.build([1, 2, 3].map(Value::from)).unwrap();
///
/// assert_eq!(row["A"], Some(Value::Integer(1)));
/// assert_eq!(row.slice(1..3), [Some(Value::Integer(2)), Some(Value::Integer(3))]);
/// ```
pub fn make_row_type<I, S>(fields: I, case_insensitive: bool) -> Result<RowType>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let schema = FieldSchema::new(fields, case_insensitive)?;
    Ok(RowType::new(schema, RowImpl::Slots))
}

/// Reusable factory for rows of one shape.
///
/// Every row built by one `RowType` shares its schema by reference.
#[derive(Debug, Clone)]
pub struct RowType {
    /// Shared schema (used by slot rows).
    schema: Arc<FieldSchema>,
    /// Shared key list (used by records).
    keys: Arc<[String]>,
    /// Implementation of the rows this type builds.
    row_impl: RowImpl,
}

impl RowType {
    /// Bind a schema to a row implementation.
    pub fn new(schema: FieldSchema, row_impl: RowImpl) -> Self {
        let keys: Arc<[String]> = schema.names().into();
        tracing::debug!(
            fields = schema.len(),
            case_insensitive = schema.is_case_insensitive(),
            row_impl = ?row_impl,
            "built row type"
        );
        Self {
            schema: Arc::new(schema),
            keys,
            row_impl,
        }
    }

    /// Build a row type for `fields` using `config`.
    pub fn with_config<I, S>(fields: I, config: &RowConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let schema = FieldSchema::new(fields, config.case_insensitive)?;
        Ok(Self::new(schema, config.row_impl))
    }

    /// Build a row type from a cursor description using `config`.
    pub fn from_description(description: &[ColumnDescription], config: &RowConfig) -> Result<Self> {
        let schema = FieldSchema::from_description(
            description,
            config.lowercase_columns,
            config.case_insensitive,
        )?;
        Ok(Self::new(schema, config.row_impl))
    }

    /// Build a row from up to `len()` values; missing trailing slots are absent.
    ///
    /// Returns `Err(Error::TooManyValues)` if more values are supplied.
    pub fn build<I, T>(&self, values: I) -> Result<Row>
    where
        I: IntoIterator<Item = T>,
        T: Into<Slot>,
    {
        let slots = fill_slots(self.schema.len(), values)?;
        Ok(self.wrap(slots))
    }

    /// Wrap already-sized slots without re-checking their count.
    pub(crate) fn wrap(&self, slots: Vec<Slot>) -> Row {
        match self.row_impl {
            RowImpl::Slots => SlotRow::from_parts(Arc::clone(&self.schema), slots).into(),
            RowImpl::Records => Record::from_parts(
                Arc::clone(&self.keys),
                self.schema.is_case_insensitive(),
                slots,
            )
            .into(),
        }
    }

    pub(crate) fn shared_keys(&self) -> &Arc<[String]> {
        &self.keys
    }

    /// Get the shared schema.
    pub fn schema(&self) -> &Arc<FieldSchema> {
        &self.schema
    }

    /// Get field names.
    pub fn fields(&self) -> &[String] {
        self.schema.names()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.schema.len()
    }

    /// Check if the row type has no fields.
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty()
    }

    /// Implementation of the rows this type builds.
    pub fn row_impl(&self) -> RowImpl {
        self.row_impl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{RowView, TypeCode, Value};

    #[test]
    fn test_make_row_type_validation() {
        assert!(matches!(make_row_type(["a", ""], false), Err(Error::InvalidField { .. })));
        assert!(matches!(
            make_row_type(["a", "A"], true),
            Err(Error::DuplicateField { .. })
        ));
        assert_eq!(make_row_type(["a", "A"], false).unwrap().len(), 2);
    }

    #[test]
    fn test_build_selects_implementation() {
        let fields = ["account_id", "owner_id"];
        let slots = RowType::with_config(fields, &RowConfig::new()).unwrap();
        let records =
            RowType::with_config(fields, &RowConfig::new().with_row_impl(RowImpl::Records))
                .unwrap();

        let a = slots.build([Value::from(1), Value::from(2)]).unwrap();
        let b = records.build([Value::from(1), Value::from(2)]).unwrap();

        assert!(matches!(a, Row::Slots(_)));
        assert!(matches!(b, Row::Record(_)));
        assert_eq!(a.as_ordered_dict(), b.as_ordered_dict());
    }

    #[test]
    fn test_rows_share_schema() {
        let row_type = make_row_type(["a"], false).unwrap();
        let r1 = row_type.build([Value::from(1)]).unwrap();
        let r2 = row_type.build([Value::from(2)]).unwrap();

        match (r1, r2) {
            (Row::Slots(r1), Row::Slots(r2)) => {
                assert!(Arc::ptr_eq(r1.schema(), r2.schema()));
                assert_eq!(Arc::strong_count(row_type.schema()), 3);
            }
            _ => panic!("Expected slot rows"),
        }
    }

    #[test]
    fn test_from_description() {
        let description = vec![
            ColumnDescription::new("GROUP_ID", TypeCode::Number),
            ColumnDescription::new("NAME", TypeCode::String),
        ];
        let config = RowConfig::new().with_case_insensitive(true);
        let row_type = RowType::from_description(&description, &config).unwrap();

        assert_eq!(row_type.fields(), ["group_id", "name"]);
        let row = row_type.build([Value::from(7)]).unwrap();
        assert_eq!(row["GROUP_ID"], Some(Value::Integer(7)));
        assert_eq!(row["name"], None);
    }

    #[test]
    fn test_build_too_many_values() {
        let row_type = make_row_type(["a", "b"], false).unwrap();
        assert!(matches!(
            row_type.build([1, 2, 3].map(Value::from)),
            Err(Error::TooManyValues { given: 3, count: 2 })
        ));
    }
}
