//! Field schema shared by every row of one result set.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::error::{Error, Result};

use super::column::ColumnDescription;

/// Ordered, validated list of field names bound to a row type.
///
/// Built once per result shape and shared by reference between rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Field names in column order (lower-cased if case-insensitive).
    names: Vec<String>,
    /// Name to position lookup.
    index: HashMap<String, usize>,
    /// Whether lookups lower-case the requested name.
    case_insensitive: bool,
}

impl FieldSchema {
    /// Build a schema from field names.
    ///
    /// Names must be non-empty ASCII strings and pairwise distinct. With
    /// `case_insensitive` the names are lower-cased first, so `["a", "A"]`
    /// is rejected as a duplicate.
    pub fn new<I, S>(fields: I, case_insensitive: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        let mut index = HashMap::new();

        for field in fields {
            let field = field.as_ref();
            if field.is_empty() {
                return Err(Error::InvalidField {
                    name: String::new(),
                    reason: "field names cannot be empty",
                });
            }
            if !field.is_ascii() {
                return Err(Error::InvalidField {
                    name: field.to_string(),
                    reason: "field names must be ASCII strings",
                });
            }

            let name = if case_insensitive {
                field.to_ascii_lowercase()
            } else {
                field.to_string()
            };
            if index.contains_key(&name) {
                return Err(Error::DuplicateField { name });
            }
            index.insert(name.clone(), names.len());
            names.push(name);
        }

        Ok(Self {
            names,
            index,
            case_insensitive,
        })
    }

    /// Build a schema from a cursor description.
    ///
    /// With `lowercase` the column names are lower-cased before validation,
    /// which is how result sets are normally keyed.
    pub fn from_description(
        description: &[ColumnDescription],
        lowercase: bool,
        case_insensitive: bool,
    ) -> Result<Self> {
        let names = description.iter().map(|c| {
            if lowercase {
                c.name.to_lowercase()
            } else {
                c.name.clone()
            }
        });
        Self::new(names, case_insensitive)
    }

    /// Get field names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get the name of the field at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether name lookups ignore case.
    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    /// Apply this schema's key normalization to a requested name.
    pub fn normalize<'a>(&self, name: &'a str) -> Cow<'a, str> {
        normalize_key(name, self.case_insensitive)
    }

    /// Find field position by name, honoring case sensitivity.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&*self.normalize(name)).copied()
    }

    /// Resolve a field name to its position.
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.position(name).ok_or_else(|| Error::ColumnNotFound {
            name: name.to_string(),
        })
    }

    /// Check a positional index against the schema.
    pub fn check_index(&self, index: usize) -> Result<usize> {
        if index < self.names.len() {
            Ok(index)
        } else {
            Err(Error::ColumnIndexOutOfBounds {
                index,
                count: self.names.len(),
            })
        }
    }
}

/// Lower-case `name` when `case_insensitive`, borrowing when nothing changes.
pub(crate) fn normalize_key(name: &str, case_insensitive: bool) -> Cow<'_, str> {
    if case_insensitive && name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeCode;

    #[test]
    fn test_schema_lookup() {
        let schema = FieldSchema::new(["person_id", "name"], false).unwrap();

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.names(), ["person_id", "name"]);
        assert_eq!(schema.position("name"), Some(1));
        assert_eq!(schema.position("NAME"), None);
        assert!(matches!(
            schema.resolve("missing"),
            Err(Error::ColumnNotFound { name }) if name == "missing"
        ));
    }

    #[test]
    fn test_schema_case_insensitive() {
        let schema = FieldSchema::new(["Person_ID", "Name"], true).unwrap();

        assert_eq!(schema.names(), ["person_id", "name"]);
        assert_eq!(schema.position("PERSON_ID"), Some(0));
        assert_eq!(schema.position("nAmE"), Some(1));
    }

    #[test]
    fn test_schema_rejects_empty_and_non_ascii() {
        assert!(matches!(
            FieldSchema::new(["a", ""], false),
            Err(Error::InvalidField { .. })
        ));
        assert!(matches!(
            FieldSchema::new(["navn", "f\u{f8}dselsdato"], false),
            Err(Error::InvalidField { .. })
        ));
    }

    #[test]
    fn test_schema_duplicates() {
        assert!(FieldSchema::new(["a", "A"], false).is_ok());
        assert!(matches!(
            FieldSchema::new(["a", "A"], true),
            Err(Error::DuplicateField { name }) if name == "a"
        ));
        assert!(matches!(
            FieldSchema::new(["a", "b", "a"], false),
            Err(Error::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_schema_from_description() {
        let description = vec![
            ColumnDescription::new("ACCOUNT_ID", TypeCode::Number),
            ColumnDescription::new("ENTITY_NAME", TypeCode::String),
        ];
        let schema = FieldSchema::from_description(&description, true, false).unwrap();

        assert_eq!(schema.names(), ["account_id", "entity_name"]);
        assert_eq!(schema.check_index(1).unwrap(), 1);
        assert!(matches!(
            schema.check_index(2),
            Err(Error::ColumnIndexOutOfBounds { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_normalize_borrows_lowercase() {
        assert!(matches!(normalize_key("abc", true), Cow::Borrowed(_)));
        assert_eq!(normalize_key("AbC", true), "abc");
        assert_eq!(normalize_key("AbC", false), "AbC");
    }
}
