//! Cursor adaptation: driver cursors in, rows out.
//!
//! `DbCursor` is the contract a database driver's cursor fulfils (DB-API
//! style `description` / `fetchmany` / `fetchall`). On top of it sit
//! [`Batches`], a plain batching iterator over raw tuples, and
//! [`RowCursor`], the forward-only iterator that wraps each tuple in a
//! [`Row`] on demand.

use std::collections::VecDeque;

use crate::collection::RowCollection;
use crate::config::RowConfig;
use crate::error::{Error, Result};
use crate::types::{ColumnDescription, Row, RowType, RowView, Slot};

/// Batch size used when a driver has no preference.
pub const DEFAULT_ARRAYSIZE: usize = 100;

/// One raw result tuple as delivered by a driver.
pub type RawRow = Vec<Slot>;

/// Driver-side cursor contract.
///
/// Errors returned by a driver (typically `Error::Io` or `Error::Driver`)
/// are propagated unchanged by everything in this crate.
pub trait DbCursor {
    /// Result-set description, or `None` if the last statement returned no rows.
    fn description(&self) -> Option<&[ColumnDescription]>;

    /// Number of rows the driver has produced so far, if it tracks this.
    fn rowcount(&self) -> Option<u64> {
        None
    }

    /// Preferred number of rows per `fetchmany` call.
    fn arraysize(&self) -> usize;

    /// Change the preferred batch size.
    fn set_arraysize(&mut self, size: usize);

    /// Fetch up to `size` rows. An empty batch signals exhaustion.
    fn fetchmany(&mut self, size: usize) -> Result<Vec<RawRow>>;

    /// Fetch all remaining rows.
    fn fetchall(&mut self) -> Result<Vec<RawRow>> {
        let size = self.arraysize().max(1);
        let mut all_rows = Vec::new();
        loop {
            let batch = self.fetchmany(size)?;
            if batch.is_empty() {
                return Ok(all_rows);
            }
            all_rows.extend(batch);
        }
    }
}

impl<C: DbCursor + ?Sized> DbCursor for &mut C {
    fn description(&self) -> Option<&[ColumnDescription]> {
        (**self).description()
    }

    fn rowcount(&self) -> Option<u64> {
        (**self).rowcount()
    }

    fn arraysize(&self) -> usize {
        (**self).arraysize()
    }

    fn set_arraysize(&mut self, size: usize) {
        (**self).set_arraysize(size)
    }

    fn fetchmany(&mut self, size: usize) -> Result<Vec<RawRow>> {
        (**self).fetchmany(size)
    }

    fn fetchall(&mut self) -> Result<Vec<RawRow>> {
        (**self).fetchall()
    }
}

/// Iterator over raw tuples, pulled from the driver `arraysize` at a time.
///
/// Exists only to bound memory and round-trips; it applies no other policy.
pub struct Batches<C> {
    cursor: C,
    arraysize: usize,
    batch: std::vec::IntoIter<RawRow>,
    done: bool,
}

impl<C: DbCursor> Batches<C> {
    /// Batch with the driver's own arraysize.
    pub fn new(cursor: C) -> Self {
        let arraysize = cursor.arraysize();
        Self::with_arraysize(cursor, arraysize)
    }

    /// Batch with an explicit size.
    pub fn with_arraysize(cursor: C, arraysize: usize) -> Self {
        Self {
            cursor,
            arraysize: arraysize.max(1),
            batch: Vec::new().into_iter(),
            done: false,
        }
    }

    /// Batch size in use.
    pub fn arraysize(&self) -> usize {
        self.arraysize
    }

    /// Give back the driver cursor.
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: DbCursor> Iterator for Batches<C> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(raw) = self.batch.next() {
                return Some(Ok(raw));
            }
            if self.done {
                return None;
            }
            match self.cursor.fetchmany(self.arraysize) {
                Ok(batch) if batch.is_empty() => {
                    self.done = true;
                }
                Ok(batch) => {
                    tracing::trace!(rows = batch.len(), arraysize = self.arraysize, "fetched batch");
                    self.batch = batch.into_iter();
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Common interface of row-yielding cursors.
pub trait Cursor {
    /// The type of item this cursor yields.
    type Item;

    /// Column descriptions for this cursor.
    fn columns(&self) -> &[ColumnDescription];

    /// Number of raw rows received from the driver so far.
    fn rowcount(&self) -> u64;

    /// Check if more items may be available (buffered or in the driver).
    fn has_more(&self) -> bool;

    /// Number of rows requested per driver round-trip.
    fn fetch_size(&self) -> usize;

    /// Set fetch size for subsequent fetches.
    fn set_fetch_size(&mut self, size: usize);

    /// Get the next item, fetching from the driver if the buffer is empty.
    ///
    /// Returns `Ok(None)` when exhausted.
    fn fetchone(&mut self) -> Result<Option<Self::Item>>;

    /// Fetch all remaining items into a vector.
    fn fetch_all(&mut self) -> Result<Vec<Self::Item>>;
}

/// Result of [`RowCursor::query_1`].
#[derive(Debug, Clone, PartialEq)]
pub enum Single {
    /// The single row had a single column; this is its value.
    Value(Slot),
    /// The single row had several columns.
    Row(Row),
}

/// Forward-only row cursor.
///
/// Queues driver batches and wraps each raw tuple in a row only when it is
/// handed out; yielded tuples are not kept. Once the driver is exhausted the
/// cursor stays exhausted.
///
/// # Example
///
/// ```
/// use db_row_rs::{Cursor, MemoryCursor, RowConfig, RowCursor, RowView, Value};
///
/// let driver = MemoryCursor::new(
///     ["ACCOUNT_ID", "ENTITY_NAME"],
///     vec![
///         vec![Some(Value::from(1)), Some(Value::from("bootstrap_account"))],
///         vec![Some(Value::from(2)), Some(Value::from("ola"))],
///     ],
/// );
///
/// let mut cursor = RowCursor::new(driver, &RowConfig::default()).unwrap();
/// while let Some(row) = cursor.fetchone().unwrap() {
///     println!("{:?}", row.get_by_name("entity_name").unwrap());
/// }
/// ```
pub struct RowCursor<C> {
    /// Driver cursor.
    cursor: C,
    /// Column descriptions captured at construction.
    columns: Vec<ColumnDescription>,
    /// Row type built from the description.
    row_type: RowType,
    /// Raw tuples fetched but not yet handed out.
    queue: VecDeque<RawRow>,
    /// Number of rows to fetch per request.
    fetch_size: usize,
    /// Total raw rows received so far.
    rows_fetched: u64,
    /// Whether the driver reported the end of the result set.
    exhausted: bool,
}

impl<C: DbCursor> RowCursor<C> {
    /// Wrap a driver cursor that has a result set.
    ///
    /// Returns `Err(Error::NoResultSet)` if the cursor has no description.
    pub fn new(cursor: C, config: &RowConfig) -> Result<Self> {
        let columns = cursor.description().ok_or(Error::NoResultSet)?.to_vec();
        let row_type = RowType::from_description(&columns, config)?;
        let fetch_size = config.arraysize.unwrap_or_else(|| cursor.arraysize()).max(1);
        Ok(Self {
            cursor,
            columns,
            row_type,
            queue: VecDeque::new(),
            fetch_size,
            rows_fetched: 0,
            exhausted: false,
        })
    }

    /// Internal: Perform a fetch from the driver.
    fn do_fetch(&mut self) -> Result<()> {
        let batch = self.cursor.fetchmany(self.fetch_size)?;
        if batch.is_empty() {
            self.exhausted = true;
            tracing::debug!(rows = self.rows_fetched, "row cursor exhausted");
            return Ok(());
        }
        tracing::trace!(rows = batch.len(), fetch_size = self.fetch_size, "fetched batch");
        self.rows_fetched += batch.len() as u64;
        self.queue.extend(batch);
        Ok(())
    }

    /// Wrap one raw tuple using this cursor's row type.
    pub fn wrap_row(&self, raw: RawRow) -> Result<Row> {
        self.row_type.build(raw)
    }

    /// Get the row type rows are built with.
    pub fn row_type(&self) -> &RowType {
        &self.row_type
    }

    /// Get field names (as normalized for rows).
    pub fn column_names(&self) -> Vec<&str> {
        self.row_type.fields().iter().map(String::as_str).collect()
    }

    /// Get the number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of raw rows currently queued.
    pub fn buffered_count(&self) -> usize {
        self.queue.len()
    }

    /// Fetch the one row a query is expected to return.
    ///
    /// A one-column row yields its value, otherwise the row itself.
    /// Returns `Err(Error::NotFound)` for no rows and
    /// `Err(Error::TooManyRows)` for more than one.
    pub fn query_1(mut self) -> Result<Single> {
        let mut rows = self.fetch_all()?;
        match rows.len() {
            0 => Err(Error::NotFound),
            1 => {
                let row = rows.remove(0);
                if row.len() == 1 {
                    Ok(Single::Value(row.into_values().remove(0)))
                } else {
                    Ok(Single::Row(row))
                }
            }
            count => Err(Error::TooManyRows { count }),
        }
    }

    /// Hand the remaining rows to a lazily-populated collection.
    pub fn into_collection<'a>(self) -> RowCollection<'a>
    where
        C: 'a,
    {
        RowCollection::new(self)
    }

    /// Give back the driver cursor.
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: DbCursor> Cursor for RowCursor<C> {
    type Item = Row;

    fn columns(&self) -> &[ColumnDescription] {
        &self.columns
    }

    fn rowcount(&self) -> u64 {
        self.rows_fetched
    }

    fn has_more(&self) -> bool {
        !self.queue.is_empty() || !self.exhausted
    }

    fn fetch_size(&self) -> usize {
        self.fetch_size
    }

    fn set_fetch_size(&mut self, size: usize) {
        self.fetch_size = size.max(1);
    }

    fn fetchone(&mut self) -> Result<Option<Self::Item>> {
        if self.queue.is_empty() && !self.exhausted {
            self.do_fetch()?;
        }
        match self.queue.pop_front() {
            Some(raw) => self.wrap_row(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Wrap every queued and remaining tuple.
    ///
    /// The queue is only drained once the driver call and every tuple's
    /// width check have succeeded, so after an error nothing is lost and a
    /// later call picks up where this one stopped.
    fn fetch_all(&mut self) -> Result<Vec<Self::Item>> {
        if !self.exhausted {
            let rest = self.cursor.fetchall()?;
            tracing::debug!(rows = rest.len(), "row cursor drained driver");
            self.rows_fetched += rest.len() as u64;
            self.queue.extend(rest);
            self.exhausted = true;
        }

        let width = self.row_type.len();
        if let Some(raw) = self.queue.iter().find(|raw| raw.len() > width) {
            return Err(Error::TooManyValues {
                given: raw.len(),
                count: width,
            });
        }
        let raw_rows: Vec<RawRow> = self.queue.drain(..).collect();
        raw_rows.into_iter().map(|raw| self.wrap_row(raw)).collect()
    }
}

impl<C: DbCursor> Iterator for RowCursor<C> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.fetchone().transpose()
    }
}
