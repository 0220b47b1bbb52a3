//! In-memory driver cursor.
//!
//! Serves pre-built tuples through the [`DbCursor`] contract. Useful for
//! tests and for feeding rows that did not come from a database.

use std::collections::VecDeque;
use std::io;

use crate::cursor::{DbCursor, RawRow, DEFAULT_ARRAYSIZE};
use crate::error::Result;
use crate::types::{ColumnDescription, TypeCode, Value};

/// A driver cursor over tuples held in memory.
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    /// Result-set description; `None` for statements without rows.
    description: Option<Vec<ColumnDescription>>,
    /// Tuples not yet fetched.
    rows: VecDeque<RawRow>,
    /// Preferred batch size.
    arraysize: usize,
    /// Number of `fetchmany` calls made so far.
    fetch_calls: usize,
    /// Number of rows handed out so far.
    rowcount: u64,
    /// `fetchmany` call (1-based) that fails with a connection reset.
    fail_on_fetch: Option<usize>,
}

impl MemoryCursor {
    /// Create a cursor over `rows`, describing columns by name.
    ///
    /// Column type codes are inferred from the first present value in each
    /// column.
    pub fn new<I, S>(columns: I, rows: Vec<RawRow>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let description = columns
            .into_iter()
            .enumerate()
            .map(|(index, name)| {
                let type_code = rows
                    .iter()
                    .find_map(|raw| raw.get(index).and_then(Option::as_ref))
                    .map_or(TypeCode::Other(0), infer_type_code);
                ColumnDescription::new(name, type_code)
            })
            .collect();
        Self::with_description(description, rows)
    }

    /// Create a cursor with an explicit description.
    pub fn with_description(description: Vec<ColumnDescription>, rows: Vec<RawRow>) -> Self {
        Self {
            description: Some(description),
            rows: rows.into(),
            arraysize: DEFAULT_ARRAYSIZE,
            fetch_calls: 0,
            rowcount: 0,
            fail_on_fetch: None,
        }
    }

    /// Create a cursor for a statement that produced no result set.
    pub fn without_result_set() -> Self {
        Self {
            description: None,
            rows: VecDeque::new(),
            arraysize: DEFAULT_ARRAYSIZE,
            fetch_calls: 0,
            rowcount: 0,
            fail_on_fetch: None,
        }
    }

    /// Set the preferred batch size.
    pub fn with_arraysize(mut self, arraysize: usize) -> Self {
        self.arraysize = arraysize;
        self
    }

    /// Make the `call`-th `fetchmany` (1-based) fail with a connection reset.
    pub fn fail_on_fetch(mut self, call: usize) -> Self {
        self.fail_on_fetch = Some(call);
        self
    }

    /// Number of `fetchmany` calls made so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls
    }

    /// Number of tuples not yet fetched.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl DbCursor for MemoryCursor {
    fn description(&self) -> Option<&[ColumnDescription]> {
        self.description.as_deref()
    }

    fn rowcount(&self) -> Option<u64> {
        Some(self.rowcount)
    }

    fn arraysize(&self) -> usize {
        self.arraysize
    }

    fn set_arraysize(&mut self, size: usize) {
        self.arraysize = size;
    }

    fn fetchmany(&mut self, size: usize) -> Result<Vec<RawRow>> {
        self.fetch_calls += 1;
        if self.fail_on_fetch == Some(self.fetch_calls) {
            let err = io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer");
            return Err(err.into());
        }
        let take = size.min(self.rows.len());
        self.rowcount += take as u64;
        Ok(self.rows.drain(..take).collect())
    }
}

fn infer_type_code(value: &Value) -> TypeCode {
    match value {
        Value::String(_) => TypeCode::String,
        Value::Integer(_) | Value::Number(_) | Value::Float(_) | Value::Bool(_) => {
            TypeCode::Number
        }
        Value::Date(_) => TypeCode::Datetime,
        Value::Raw(_) => TypeCode::Binary,
    }
}
