//! Row contract shared by both row implementations.
//!
//! A row is a fixed number of slots addressed by position or by field
//! name. `RowView` supplies every accessor on top of five primitives, so the
//! legacy slot-array rows and the key/value records behave identically.

use std::collections::HashMap;
use std::ops::{Bound, Range, RangeBounds};

use indexmap::IndexMap;

use crate::error::{Error, Result};

use super::record::Record;
use super::slot_row::SlotRow;
use super::value::{Slot, Value};

/// Accessors common to every row implementation.
///
/// Name lookups go through [`RowView::position`], which applies the row's
/// case normalization. Attribute-style accessors (`get_attr` and friends)
/// are aliases for the name-based ones: there are no dynamic attributes,
/// only the name-to-position map.
pub trait RowView {
    /// Field names in column order.
    fn field_names(&self) -> &[String];

    /// Whether name lookups ignore case.
    fn is_case_insensitive(&self) -> bool;

    /// Position of a field name, after case normalization.
    fn position(&self, name: &str) -> Option<usize>;

    /// All slots in column order.
    fn slots(&self) -> &[Slot];

    /// All slots in column order, mutably. The slot count never changes.
    fn slots_mut(&mut self) -> &mut [Slot];

    /// Number of fields.
    fn len(&self) -> usize {
        self.slots().len()
    }

    /// Check if the row has no fields.
    fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    /// Resolve a field name to its position.
    fn resolve(&self, name: &str) -> Result<usize> {
        self.position(name).ok_or_else(|| Error::ColumnNotFound {
            name: name.to_string(),
        })
    }

    /// Check a positional index.
    fn check_index(&self, index: usize) -> Result<usize> {
        if index < self.len() {
            Ok(index)
        } else {
            Err(Error::ColumnIndexOutOfBounds {
                index,
                count: self.len(),
            })
        }
    }

    /// Get value by position (0-based). `Ok(None)` means the slot is absent.
    fn get_by_index(&self, index: usize) -> Result<Option<&Value>> {
        let index = self.check_index(index)?;
        Ok(self.slots()[index].as_ref())
    }

    /// Get value by field name.
    fn get_by_name(&self, name: &str) -> Result<Option<&Value>> {
        let index = self.resolve(name)?;
        Ok(self.slots()[index].as_ref())
    }

    /// Get value by attribute name.
    fn get_attr(&self, name: &str) -> Result<Option<&Value>> {
        self.get_by_name(name)
    }

    /// Set value by position.
    fn set_by_index(&mut self, index: usize, value: impl Into<Slot>) -> Result<()> {
        let index = self.check_index(index)?;
        self.slots_mut()[index] = value.into();
        Ok(())
    }

    /// Set value by field name.
    fn set_by_name(&mut self, name: &str, value: impl Into<Slot>) -> Result<()> {
        let index = self.resolve(name)?;
        self.slots_mut()[index] = value.into();
        Ok(())
    }

    /// Set value by attribute name.
    fn set_attr(&mut self, name: &str, value: impl Into<Slot>) -> Result<()> {
        self.set_by_name(name, value)
    }

    /// Reset the slot at `index` to absent.
    fn delete_by_index(&mut self, index: usize) -> Result<()> {
        self.set_by_index(index, None::<Value>)
    }

    /// Reset the named slot to absent.
    fn delete_by_name(&mut self, name: &str) -> Result<()> {
        self.set_by_name(name, None::<Value>)
    }

    /// Reset the slot for attribute `name` to absent.
    fn delete_attr(&mut self, name: &str) -> Result<()> {
        self.delete_by_name(name)
    }

    /// True if `name` is a field and its slot holds a value.
    fn has_key(&self, name: &str) -> bool {
        self.position(name)
            .is_some_and(|index| self.slots()[index].is_some())
    }

    /// Field names in column order.
    fn keys(&self) -> &[String] {
        self.field_names()
    }

    /// Current slots in column order; absent slots are `None`.
    fn values(&self) -> &[Slot] {
        self.slots()
    }

    /// `(name, value)` pairs in column order.
    fn items(&self) -> Vec<(&str, Option<&Value>)> {
        self.field_names()
            .iter()
            .map(String::as_str)
            .zip(self.slots().iter().map(Option::as_ref))
            .collect()
    }

    /// Mapping from field name to current slot.
    fn as_dict(&self) -> HashMap<String, Slot> {
        self.field_names()
            .iter()
            .cloned()
            .zip(self.slots().iter().cloned())
            .collect()
    }

    /// Mapping from field name to current slot, in column order.
    fn as_ordered_dict(&self) -> IndexMap<String, Slot> {
        self.field_names()
            .iter()
            .cloned()
            .zip(self.slots().iter().cloned())
            .collect()
    }

    /// Copy of every slot.
    fn to_tuple(&self) -> Vec<Slot> {
        self.slots().to_vec()
    }

    /// Copy of the slots in `range`, clamped to the row like sequence slicing.
    fn slice(&self, range: impl RangeBounds<usize>) -> Vec<Slot> {
        let range = clamp_range(range, self.len());
        self.slots()[range].to_vec()
    }

    /// Assign `values` to the slots in `range` (clamped to the row).
    ///
    /// The number of values must match the clamped range length exactly.
    fn set_slice<I, T>(&mut self, range: impl RangeBounds<usize>, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Slot>,
    {
        let range = clamp_range(range, self.len());
        let values: Vec<Slot> = values.into_iter().map(Into::into).collect();
        if values.len() != range.len() {
            return Err(Error::SliceLengthMismatch {
                expected: range.len(),
                actual: values.len(),
            });
        }
        for (slot, value) in self.slots_mut()[range].iter_mut().zip(values) {
            *slot = value;
        }
        Ok(())
    }

    /// Reset the slots in `range` (clamped to the row) to absent.
    fn delete_slice(&mut self, range: impl RangeBounds<usize>) {
        let range = clamp_range(range, self.len());
        self.slots_mut()[range].fill(None);
    }

    /// Reset every slot to absent.
    fn clear(&mut self) {
        self.slots_mut().fill(None);
    }

    /// True if any present slot equals `value`.
    fn contains(&self, value: &Value) -> bool {
        self.slots().iter().any(|slot| slot.as_ref() == Some(value))
    }

    /// This row's slots followed by `other`.
    ///
    /// Always yields a plain slot vector, whatever the right-hand side is.
    fn concat<I>(&self, other: I) -> Vec<Slot>
    where
        I: IntoIterator<Item = Slot>,
    {
        let mut out = self.to_tuple();
        out.extend(other);
        out
    }
}

/// Resolve a range against a sequence of `len` items, clamping both ends.
pub(crate) fn clamp_range(range: impl RangeBounds<usize>, len: usize) -> Range<usize> {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    let end = end.min(len);
    start.min(end)..end
}

/// A row of query results, in whichever implementation the factory chose.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Legacy fixed slot array with a shared schema index.
    Slots(SlotRow),
    /// Key list plus value vector.
    Record(Record),
}

impl Row {
    /// Consume the row, returning its slots.
    pub fn into_values(self) -> Vec<Slot> {
        match self {
            Row::Slots(row) => row.into_values(),
            Row::Record(row) => row.into_values(),
        }
    }

    /// Iterate over slots.
    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots().iter()
    }
}

impl RowView for Row {
    fn field_names(&self) -> &[String] {
        match self {
            Row::Slots(row) => row.field_names(),
            Row::Record(row) => row.field_names(),
        }
    }

    fn is_case_insensitive(&self) -> bool {
        match self {
            Row::Slots(row) => row.is_case_insensitive(),
            Row::Record(row) => row.is_case_insensitive(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        match self {
            Row::Slots(row) => row.position(name),
            Row::Record(row) => row.position(name),
        }
    }

    fn slots(&self) -> &[Slot] {
        match self {
            Row::Slots(row) => row.slots(),
            Row::Record(row) => row.slots(),
        }
    }

    fn slots_mut(&mut self) -> &mut [Slot] {
        match self {
            Row::Slots(row) => row.slots_mut(),
            Row::Record(row) => row.slots_mut(),
        }
    }
}

impl From<SlotRow> for Row {
    fn from(row: SlotRow) -> Self {
        Row::Slots(row)
    }
}

impl From<Record> for Row {
    fn from(row: Record) -> Self {
        Row::Record(row)
    }
}

/// Operator impls shared by every row type: `row[i]`, `row["name"]`,
/// concatenation with `+` and by-reference iteration.
///
/// Indexing panics on an unknown position or name, like slice indexing;
/// use the `RowView` getters for a `Result`.
macro_rules! impl_row_ops {
    ($ty:ty) => {
        impl std::ops::Index<usize> for $ty {
            type Output = $crate::types::Slot;

            fn index(&self, index: usize) -> &Self::Output {
                &$crate::types::RowView::slots(self)[index]
            }
        }

        impl std::ops::IndexMut<usize> for $ty {
            fn index_mut(&mut self, index: usize) -> &mut Self::Output {
                &mut $crate::types::RowView::slots_mut(self)[index]
            }
        }

        impl<'a> std::ops::Index<&'a str> for $ty {
            type Output = $crate::types::Slot;

            fn index(&self, name: &'a str) -> &Self::Output {
                match $crate::types::RowView::position(self, name) {
                    Some(index) => &$crate::types::RowView::slots(self)[index],
                    None => panic!("no field named {:?}", name),
                }
            }
        }

        impl<'a> std::ops::IndexMut<&'a str> for $ty {
            fn index_mut(&mut self, name: &'a str) -> &mut Self::Output {
                match $crate::types::RowView::position(self, name) {
                    Some(index) => &mut $crate::types::RowView::slots_mut(self)[index],
                    None => panic!("no field named {:?}", name),
                }
            }
        }

        impl<'a, R: $crate::types::RowView> std::ops::Add<&'a R> for &$ty {
            type Output = Vec<$crate::types::Slot>;

            fn add(self, rhs: &'a R) -> Self::Output {
                $crate::types::RowView::concat(self, $crate::types::RowView::slots(rhs).iter().cloned())
            }
        }

        impl std::ops::Add<Vec<$crate::types::Slot>> for &$ty {
            type Output = Vec<$crate::types::Slot>;

            fn add(self, rhs: Vec<$crate::types::Slot>) -> Self::Output {
                $crate::types::RowView::concat(self, rhs)
            }
        }

        impl std::ops::Add<&$ty> for Vec<$crate::types::Slot> {
            type Output = Vec<$crate::types::Slot>;

            fn add(mut self, rhs: &$ty) -> Self::Output {
                self.extend($crate::types::RowView::slots(rhs).iter().cloned());
                self
            }
        }

        impl<'a> IntoIterator for &'a $ty {
            type Item = &'a $crate::types::Slot;
            type IntoIter = std::slice::Iter<'a, $crate::types::Slot>;

            fn into_iter(self) -> Self::IntoIter {
                $crate::types::RowView::slots(self).iter()
            }
        }
    };
}

pub(crate) use impl_row_ops;

impl_row_ops!(Row);

impl IntoIterator for Row {
    type Item = Slot;
    type IntoIter = std::vec::IntoIter<Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_values().into_iter()
    }
}
