//! Error types for row objects and row collections.

use std::io;
use thiserror::Error;

/// Result type alias for row operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for row, collection and cursor operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error raised by the underlying driver.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Any other error raised by the underlying driver, passed through as is.
    #[error(transparent)]
    Driver(Box<dyn std::error::Error + Send + Sync>),

    /// Field name rejected while building a schema.
    #[error("Invalid field name {name:?}: {reason}")]
    InvalidField { name: String, reason: &'static str },

    /// Two field names collide (after lower-casing, for case-insensitive rows).
    #[error("Field names must be unique: {name:?}")]
    DuplicateField { name: String },

    /// Field name not present in the schema.
    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    /// Field index outside the schema.
    #[error("Column index {index} out of bounds (columns: {count})")]
    ColumnIndexOutOfBounds { index: usize, count: usize },

    /// More values than fields were supplied for a row.
    #[error("Too many values for row: got {given}, row has {count} fields")]
    TooManyValues { given: usize, count: usize },

    /// Slice assignment with the wrong number of values.
    #[error("Slice assignment needs {expected} values, got {actual}")]
    SliceLengthMismatch { expected: usize, actual: usize },

    /// Row index beyond the end of an exhausted collection.
    #[error("Row index {index} out of range (rows: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// `one()` found a second row.
    #[error("Collection contained more than one row")]
    MultipleRows,

    /// A single-row query returned no rows.
    #[error("Query returned no rows")]
    NotFound,

    /// A single-row query returned more than one row.
    #[error("Query returned {count} rows, expected one")]
    TooManyRows { count: usize },

    /// The cursor has no result set to wrap (statement returned no rows).
    #[error("Cursor has no result set description")]
    NoResultSet,

    /// Invalid configuration value.
    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

impl Error {
    /// Wrap a driver error without altering its message or source.
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Driver(err.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this is one of the unknown-field errors (bad name or bad index).
    pub fn is_unknown_field(&self) -> bool {
        matches!(
            self,
            Error::ColumnNotFound { .. } | Error::ColumnIndexOutOfBounds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_is_transparent() {
        let err = Error::driver("ORA-03113: end-of-file on communication channel");
        assert_eq!(
            err.to_string(),
            "ORA-03113: end-of-file on communication channel"
        );
    }

    #[test]
    fn test_unknown_field_classification() {
        assert!(Error::ColumnNotFound { name: "x".into() }.is_unknown_field());
        assert!(Error::ColumnIndexOutOfBounds { index: 3, count: 2 }.is_unknown_field());
        assert!(!Error::MultipleRows.is_unknown_field());
    }
}
