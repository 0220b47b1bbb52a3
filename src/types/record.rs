//! Record row implementation: a shared key list paired with a value vector.

use std::sync::Arc;

use crate::error::Result;

use super::row::{impl_row_ops, RowView};
use super::factory::RowType;
use super::schema::normalize_key;
use super::slot_row::fill_slots;
use super::value::Slot;

/// A row stored as keys plus values.
///
/// Keys are resolved by scanning the key list, which is cheaper than a
/// hash lookup for the narrow rows most queries return.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Shared field names, already normalized.
    keys: Arc<[String]>,
    /// One slot per key.
    values: Vec<Slot>,
    /// Whether lookups lower-case the requested key.
    case_insensitive: bool,
}

impl Record {
    /// Create a record sharing `row_type`'s key list.
    pub fn new<I, T>(row_type: &RowType, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<Slot>,
    {
        let values = fill_slots(row_type.len(), values)?;
        Ok(Self::from_parts(
            Arc::clone(row_type.shared_keys()),
            row_type.schema().is_case_insensitive(),
            values,
        ))
    }

    pub(crate) fn from_parts(keys: Arc<[String]>, case_insensitive: bool, values: Vec<Slot>) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self {
            keys,
            values,
            case_insensitive,
        }
    }

    /// Consume the record, returning its slots.
    pub fn into_values(self) -> Vec<Slot> {
        self.values
    }
}

impl RowView for Record {
    fn field_names(&self) -> &[String] {
        &self.keys
    }

    fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = normalize_key(name, self.case_insensitive);
        self.keys.iter().position(|k| *k == name)
    }

    fn slots(&self) -> &[Slot] {
        &self.values
    }

    fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.values
    }
}

impl_row_ops!(Record);
