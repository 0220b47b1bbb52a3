//! Legacy row implementation: a fixed slot array over a shared schema.

use std::sync::Arc;

use crate::error::{Error, Result};

use super::row::{impl_row_ops, RowView};
use super::schema::FieldSchema;
use super::value::Slot;

/// A row stored as a boxed slot array.
///
/// Name lookups go through the schema's hash index, so access cost does not
/// grow with the number of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRow {
    /// Shared field schema (reference counted).
    schema: Arc<FieldSchema>,
    /// One slot per field.
    slots: Box<[Slot]>,
}

impl SlotRow {
    /// Create a row from the first `values`, padding missing slots with absent.
    pub fn new<I, T>(schema: Arc<FieldSchema>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Slot>,
    {
        let slots = fill_slots(schema.len(), values)?;
        Ok(Self::from_parts(schema, slots))
    }

    pub(crate) fn from_parts(schema: Arc<FieldSchema>, slots: Vec<Slot>) -> Self {
        debug_assert_eq!(schema.len(), slots.len());
        Self {
            schema,
            slots: slots.into_boxed_slice(),
        }
    }

    /// Get the shared schema.
    pub fn schema(&self) -> &Arc<FieldSchema> {
        &self.schema
    }

    /// Consume the row, returning its slots.
    pub fn into_values(self) -> Vec<Slot> {
        self.slots.into_vec()
    }
}

impl RowView for SlotRow {
    fn field_names(&self) -> &[String] {
        self.schema.names()
    }

    fn is_case_insensitive(&self) -> bool {
        self.schema.is_case_insensitive()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.schema.position(name)
    }

    fn slots(&self) -> &[Slot] {
        &self.slots
    }

    fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }
}

impl_row_ops!(SlotRow);

/// Collect at most `count` values into slots, padding the tail with absent.
pub(crate) fn fill_slots<I, T>(count: usize, values: I) -> Result<Vec<Slot>>
where
    I: IntoIterator<Item = T>,
    T: Into<Slot>,
{
    let mut values = values.into_iter();
    let mut slots: Vec<Slot> = Vec::with_capacity(count);
    slots.extend(values.by_ref().take(count).map(Into::into));

    let extra = values.count();
    if extra > 0 {
        return Err(Error::TooManyValues {
            given: count + extra,
            count,
        });
    }

    slots.resize(count, None);
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn make_test_schema(case_insensitive: bool) -> Arc<FieldSchema> {
        Arc::new(FieldSchema::new(["a", "b", "c"], case_insensitive).unwrap())
    }

    #[test]
    fn test_slot_row_access() {
        let row = SlotRow::new(make_test_schema(false), [1, 2, 3].map(Value::from)).unwrap();

        assert_eq!(row.len(), 3);
        assert_eq!(row.get_by_index(0).unwrap(), Some(&Value::Integer(1)));
        assert_eq!(row.get_by_name("b").unwrap(), Some(&Value::Integer(2)));
        assert_eq!(row["c"], Some(Value::Integer(3)));
        assert!(row.get_by_name("B").is_err());
    }

    #[test]
    fn test_slot_row_padding() {
        let row = SlotRow::new(make_test_schema(false), [Value::from("x")]).unwrap();

        assert_eq!(row.values(), [Some(Value::from("x")), None, None]);
        assert!(row.has_key("a"));
        assert!(!row.has_key("b"));
    }

    #[test]
    fn test_slot_row_too_many_values() {
        let err = SlotRow::new(make_test_schema(false), [1, 2, 3, 4, 5].map(Value::from))
            .unwrap_err();
        assert!(matches!(err, Error::TooManyValues { given: 5, count: 3 }));
    }

    #[test]
    fn test_slot_row_case_insensitive_write() {
        let mut row = SlotRow::new(make_test_schema(true), [1, 2, 3].map(Value::from)).unwrap();

        row.set_attr("B", Value::from(20)).unwrap();
        assert_eq!(row["b"], Some(Value::Integer(20)));
        assert_eq!(row.schema().names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_fill_slots_exact() {
        let slots = fill_slots(2, [Value::from(1), Value::from(2)]).unwrap();
        assert_eq!(slots.len(), 2);
        assert!(fill_slots(0, Vec::<Value>::new()).unwrap().is_empty());
    }
}
