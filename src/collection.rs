//! Lazily-populated, cacheable row collections.
//!
//! A [`RowCollection`] pulls rows from its source only as far as the
//! furthest index a caller has asked for. Pulled rows are cached in source
//! order and never fetched twice; once the source runs dry the collection
//! works purely against its cache.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Bound, RangeBounds};

use indexmap::IndexMap;

use crate::config::RowConfig;
use crate::cursor::{Batches, DbCursor};
use crate::error::{Error, Result};
use crate::types::{clamp_range, Row, RowType, RowView, Slot, Value};

/// Boxed source of rows feeding a collection.
pub type RowSource<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// Caching sequence of rows over a lazy source.
///
/// # Example
///
/// ```
/// use db_row_rs::{MemoryCursor, RowCollection, RowConfig, Value};
///
/// let driver = MemoryCursor::new(
///     ["OU_ID"],
///     (1..=3).map(|id| vec![Some(Value::from(id))]).collect(),
/// );
/// let mut ous = RowCollection::from_cursor(driver, &RowConfig::default()).unwrap();
///
/// assert_eq!(ous.get(1).unwrap()["ou_id"], Some(Value::Integer(2)));
/// assert_eq!(ous.len(), 2);
/// assert_eq!(ous.all().unwrap().len(), 3);
/// ```
pub struct RowCollection<'a> {
    /// Rows pulled so far, in source order.
    rows: Vec<Row>,
    /// Unconsumed source; `None` once exhausted.
    source: Option<RowSource<'a>>,
}

impl<'a> RowCollection<'a> {
    /// Wrap a lazy row source.
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = Result<Row>>,
        I::IntoIter: 'a,
    {
        Self {
            rows: Vec::new(),
            source: Some(Box::new(source.into_iter())),
        }
    }

    /// A fully materialized collection over `rows`.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows, source: None }
    }

    /// Wrap a driver cursor, pulling `fetchmany` batches as rows are needed.
    ///
    /// Rows are built from the cursor's description according to `config`.
    /// Returns `Err(Error::NoResultSet)` if the cursor has no description.
    pub fn from_cursor<C>(cursor: C, config: &RowConfig) -> Result<Self>
    where
        C: DbCursor + 'a,
    {
        let description = cursor.description().ok_or(Error::NoResultSet)?;
        let row_type = RowType::from_description(description, config)?;
        let batches = match config.arraysize {
            Some(size) => Batches::with_arraysize(cursor, size),
            None => Batches::new(cursor),
        };
        Ok(Self::new(
            batches.map(move |raw| raw.and_then(|raw| row_type.build(raw))),
        ))
    }

    /// Number of rows cached so far (not the total unless fully drained).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows have been cached so far.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the source may still hold rows.
    pub fn is_pending(&self) -> bool {
        self.source.is_some()
    }

    /// Internal: Pull one row from the source into the cache.
    ///
    /// Returns `Ok(false)` once the source is exhausted. Source errors are
    /// returned as is and leave the collection pending.
    fn pull(&mut self) -> Result<bool> {
        let Some(source) = self.source.as_mut() else {
            return Ok(false);
        };
        match source.next() {
            Some(Ok(row)) => {
                self.rows.push(row);
                Ok(true)
            }
            Some(Err(e)) => Err(e),
            None => {
                self.source = None;
                tracing::debug!(rows = self.rows.len(), "row collection exhausted");
                Ok(false)
            }
        }
    }

    /// Internal: Pull until `count` rows are cached or the source runs dry.
    fn fill_to(&mut self, count: usize) -> Result<()> {
        while self.rows.len() < count && self.pull()? {}
        Ok(())
    }

    /// Internal: Pull everything.
    fn fill_all(&mut self) -> Result<()> {
        while self.pull()? {}
        Ok(())
    }

    /// Get the row at `index`, pulling from the source as needed.
    ///
    /// Returns `Err(Error::IndexOutOfRange)` if the source holds fewer rows.
    pub fn get(&mut self, index: usize) -> Result<&Row> {
        self.fill_to(index.saturating_add(1))?;
        let len = self.rows.len();
        self.rows
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// A new, fully materialized collection over `range` of this one.
    ///
    /// Pulls up to the end of the range (everything for an open range);
    /// bounds past the end are clamped.
    pub fn slice(&mut self, range: impl RangeBounds<usize>) -> Result<RowCollection<'static>> {
        match range.end_bound() {
            Bound::Included(&end) => self.fill_to(end.saturating_add(1))?,
            Bound::Excluded(&end) => self.fill_to(end)?,
            Bound::Unbounded => self.fill_all()?,
        }
        let range = clamp_range(range, self.rows.len());
        Ok(RowCollection::from_rows(self.rows[range].to_vec()))
    }

    /// Iterate over cached rows, then continue pulling from the source.
    ///
    /// A second iteration replays the cache and resumes where the source
    /// left off; the source itself is never restarted.
    pub fn iter(&mut self) -> Iter<'_, 'a> {
        Iter {
            collection: self,
            pos: 0,
        }
    }

    /// Pull every remaining row and return them all.
    pub fn all(&mut self) -> Result<&[Row]> {
        self.fill_all()?;
        Ok(&self.rows)
    }

    /// All rows as name-to-value maps.
    pub fn all_dicts(&mut self) -> Result<Vec<HashMap<String, Slot>>> {
        Ok(self.all()?.iter().map(RowView::as_dict).collect())
    }

    /// All rows as name-to-value maps in column order.
    pub fn all_ordered_dicts(&mut self) -> Result<Vec<IndexMap<String, Slot>>> {
        Ok(self.all()?.iter().map(RowView::as_ordered_dict).collect())
    }

    /// First row, or `None` if there are no rows.
    pub fn first(&mut self) -> Result<Option<&Row>> {
        self.fill_to(1)?;
        Ok(self.rows.first())
    }

    /// First row, or `err` if there are no rows.
    pub fn first_or_err(&mut self, err: Error) -> Result<&Row> {
        self.first()?.ok_or(err)
    }

    /// The only row, or `None` if there are no rows.
    ///
    /// Returns `Err(Error::MultipleRows)` if a second row exists.
    pub fn one(&mut self) -> Result<Option<&Row>> {
        self.fill_to(2)?;
        if self.rows.len() > 1 {
            return Err(Error::MultipleRows);
        }
        Ok(self.rows.first())
    }

    /// The only row, or `err` if there are no rows.
    pub fn one_or_err(&mut self, err: Error) -> Result<&Row> {
        self.one()?.ok_or(err)
    }

    /// First column of the only row; `None` if there is no row or the slot
    /// is absent.
    pub fn scalar(&mut self) -> Result<Option<&Value>> {
        match self.one()? {
            Some(row) if !row.is_empty() => row.get_by_index(0),
            _ => Ok(None),
        }
    }

    /// Pull every remaining row and take ownership of them.
    pub fn into_rows(mut self) -> Result<Vec<Row>> {
        self.fill_all()?;
        Ok(self.rows)
    }
}

impl fmt::Debug for RowCollection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowCollection")
            .field("rows", &self.rows)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<'a> IntoIterator for RowCollection<'a> {
    type Item = Result<Row>;
    type IntoIter = RowSource<'a>;

    fn into_iter(self) -> Self::IntoIter {
        let cached = self.rows.into_iter().map(Ok);
        Box::new(cached.chain(self.source.into_iter().flatten()))
    }
}

/// Iterator returned by [`RowCollection::iter`].
pub struct Iter<'c, 'a> {
    collection: &'c mut RowCollection<'a>,
    pos: usize,
}

impl Iterator for Iter<'_, '_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.collection.rows.len() {
            match self.collection.pull() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
        let row = self.collection.rows[self.pos].clone();
        self.pos += 1;
        Some(Ok(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::make_row_type;

    fn make_test_rows(count: i64) -> Vec<Row> {
        let row_type = make_row_type(["n"], false).unwrap();
        (0..count)
            .map(|n| row_type.build([Value::from(n)]).unwrap())
            .collect()
    }

    #[test]
    fn test_get_pulls_lazily() {
        let mut collection = RowCollection::new(make_test_rows(3).into_iter().map(Ok));

        assert_eq!(collection.len(), 0);
        assert_eq!(collection.get(1).unwrap()["n"], Some(Value::Integer(1)));
        assert_eq!(collection.len(), 2);
        assert!(collection.is_pending());

        assert!(matches!(
            collection.get(5),
            Err(Error::IndexOutOfRange { index: 5, len: 3 })
        ));
        assert!(!collection.is_pending());
    }

    #[test]
    fn test_slice() {
        let mut collection = RowCollection::new(make_test_rows(5).into_iter().map(Ok));

        let mut middle = collection.slice(1..3).unwrap();
        assert_eq!(collection.len(), 3);
        assert!(!middle.is_pending());
        assert_eq!(middle.all().unwrap().len(), 2);
        assert_eq!(middle.get(0).unwrap()["n"], Some(Value::Integer(1)));

        let tail = collection.slice(3..).unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(collection.len(), 5);

        assert!(collection.slice(4..10).unwrap().len() == 1);
    }

    #[test]
    fn test_iter_resumes() {
        let mut collection = RowCollection::new(make_test_rows(4).into_iter().map(Ok));

        let first_two: Vec<Row> = collection
            .iter()
            .take(2)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(first_two.len(), 2);
        assert_eq!(collection.len(), 2);

        let everything: Vec<Row> = collection.iter().collect::<Result<_>>().unwrap();
        assert_eq!(everything, make_test_rows(4));
        assert_eq!(collection.len(), 4);
    }

    #[test]
    fn test_first_one_scalar() {
        let mut empty = RowCollection::new(Vec::new());
        assert!(empty.first().unwrap().is_none());
        assert!(empty.one().unwrap().is_none());
        assert!(empty.scalar().unwrap().is_none());
        assert!(matches!(
            empty.first_or_err(Error::NotFound),
            Err(Error::NotFound)
        ));

        let mut single = RowCollection::from_rows(make_test_rows(1));
        assert_eq!(single.scalar().unwrap(), Some(&Value::Integer(0)));
        assert!(single.one_or_err(Error::NotFound).is_ok());

        let mut many = RowCollection::new(make_test_rows(3).into_iter().map(Ok));
        assert!(many.first().unwrap().is_some());
        assert!(matches!(many.one(), Err(Error::MultipleRows)));
        assert!(matches!(many.scalar(), Err(Error::MultipleRows)));
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn test_into_iter_chains_cache_and_source() {
        let mut collection = RowCollection::new(make_test_rows(3).into_iter().map(Ok));
        collection.get(0).unwrap();

        let rows: Vec<Row> = collection.into_iter().collect::<Result<_>>().unwrap();
        assert_eq!(rows, make_test_rows(3));
    }

    #[test]
    fn test_source_error_propagates() {
        let source = vec![
            Ok(make_test_rows(1).remove(0)),
            Err(Error::driver("ORA-03135: connection lost contact")),
        ];
        let mut collection = RowCollection::new(source);

        assert!(collection.get(0).is_ok());
        let err = collection.get(1).unwrap_err();
        assert_eq!(err.to_string(), "ORA-03135: connection lost contact");
        assert!(collection.is_pending());
    }
}
