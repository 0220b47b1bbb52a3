//! Column descriptions reported by a driver cursor.
//!
//! These mirror the DB-API `cursor.description` 7-tuple. Only the name is
//! needed to build a row type; the remaining attributes are kept so callers
//! can inspect the result set.

/// Broad type category of a column, as reported by the driver.
///
/// Note: Nullability is a column property, not a type property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    /// Character data (VARCHAR2, CHAR, TEXT, ...).
    String,
    /// Numeric data (NUMBER, INTEGER, NUMERIC, ...).
    Number,
    /// Date/time data.
    Datetime,
    /// Binary data (RAW, BYTEA, BLOB, ...).
    Binary,
    /// Row identifier.
    RowId,
    /// Driver-specific type code with no DB-API category.
    Other(u16),
}

/// One entry of a cursor's result-set description.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescription {
    /// Column name as reported by the driver.
    pub name: String,
    /// Column type category.
    pub type_code: TypeCode,
    /// Display size, if known.
    pub display_size: Option<u32>,
    /// Internal size in bytes, if known.
    pub internal_size: Option<u32>,
    /// Numeric precision, if applicable.
    pub precision: Option<i16>,
    /// Numeric scale, if applicable.
    pub scale: Option<i16>,
    /// Whether NULL values are allowed.
    pub nullable: bool,
}

impl ColumnDescription {
    /// Create a column description with minimal info.
    pub fn new(name: impl Into<String>, type_code: TypeCode) -> Self {
        Self {
            name: name.into(),
            type_code,
            display_size: None,
            internal_size: None,
            precision: None,
            scale: None,
            nullable: true,
        }
    }

    /// Set numeric precision and scale.
    pub fn with_precision(mut self, precision: i16, scale: i16) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Mark the column as NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}
