//! Column values carried by row slots.

use chrono::NaiveDateTime;
use std::fmt;

/// A single slot of a row: a value, or absent.
///
/// SQL NULL and an unset or deleted slot are both represented as `None`.
pub type Slot = Option<Value>;

/// A column value fetched from the database.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value (VARCHAR2, CHAR, TEXT, ...).
    String(String),
    /// Integer value.
    Integer(i64),
    /// Decimal number as text (preserves precision).
    /// Can be converted to i64/f64 as needed.
    Number(String),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// Date/time value (no timezone).
    Date(NaiveDateTime),
    /// Raw binary value.
    Raw(Vec<u8>),
}

impl Value {
    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Number(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to i64.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Number(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to convert to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Number(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Try to get the value as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a NaiveDateTime.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_raw(&self) -> Option<&[u8]> {
        match self {
            Value::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Number(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Raw(bytes) => write!(f, "<RAW: {} bytes>", bytes.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Date(dt)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Raw(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_value_string() {
        let val = Value::from("hello");
        assert_eq!(val.as_str(), Some("hello"));
        assert_eq!(val.to_i64(), None);
        assert_eq!(format!("{}", val), "hello");
    }

    #[test]
    fn test_value_number() {
        let val = Value::Number("123.45".to_string());
        assert_eq!(val.as_str(), Some("123.45"));
        assert_eq!(val.to_i64(), None); // "123.45" doesn't parse as i64
        assert_eq!(val.to_f64(), Some(123.45));

        let int_val = Value::Number("42".to_string());
        assert_eq!(int_val.to_i64(), Some(42));
        assert_eq!(Value::from(42).to_f64(), Some(42.0));
    }

    #[test]
    fn test_value_date_display() {
        let dt = NaiveDate::from_ymd_opt(2004, 2, 29)
            .unwrap()
            .and_hms_opt(13, 5, 0)
            .unwrap();
        let val = Value::from(dt);
        assert_eq!(val.as_date(), Some(dt));
        assert_eq!(val.to_string(), "2004-02-29 13:05:00");
    }

    #[test]
    fn test_value_bool_and_raw() {
        let flag = Value::from(true);
        assert_eq!(flag.as_bool(), Some(true));
        assert_eq!(flag.as_raw(), None);
        assert_eq!(flag.to_string(), "true");

        let raw = Value::from(vec![0xde, 0xad]);
        assert_eq!(raw.as_raw(), Some(&[0xde, 0xad][..]));
        assert_eq!(raw.as_bool(), None);
        assert_eq!(Value::from(1).as_bool(), None);
    }

    #[test]
    fn test_zero_and_empty_are_not_absent() {
        let slots: Vec<Slot> = vec![Some(Value::from(0)), Some(Value::from("")), None];
        assert!(slots[0].is_some());
        assert!(slots[1].is_some());
        assert!(slots[2].is_none());
    }
}
