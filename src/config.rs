//! Row configuration, resolved once at application start.
//!
//! The library never reads process state on its own; the application builds
//! a [`RowConfig`] (from TOML, from key/value pairs or from the environment)
//! and passes it to every factory and collection it creates.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable selecting the row implementation.
pub const ENV_ROW_IMPL: &str = "DB_ROW_IMPL";
/// Environment variable enabling case-insensitive field names.
pub const ENV_CASE_INSENSITIVE: &str = "DB_ROW_CASE_INSENSITIVE";
/// Environment variable overriding the driver's fetch batch size.
pub const ENV_ARRAYSIZE: &str = "DB_ROW_ARRAYSIZE";
/// Environment variable controlling lower-casing of described column names.
pub const ENV_LOWERCASE_COLUMNS: &str = "DB_ROW_LOWERCASE_COLUMNS";

/// Which row implementation factories produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowImpl {
    /// Legacy fixed slot array with a hashed schema index.
    #[default]
    Slots,
    /// Key list plus value vector.
    Records,
}

impl RowImpl {
    /// Parse a configuration string (`slots`/`legacy` or `records`/`modern`).
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "slots" | "legacy" | "db_row" => Ok(RowImpl::Slots),
            "records" | "modern" => Ok(RowImpl::Records),
            other => Err(Error::config(format!("unknown row implementation {other:?}"))),
        }
    }
}

/// Settings threaded into row factories and collections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RowConfig {
    /// Row implementation to build.
    pub row_impl: RowImpl,
    /// Whether field names are matched without regard to case.
    pub case_insensitive: bool,
    /// Fetch batch size; `None` keeps the driver's own arraysize.
    pub arraysize: Option<usize>,
    /// Lower-case column names taken from a cursor description.
    pub lowercase_columns: bool,
}

impl Default for RowConfig {
    fn default() -> Self {
        Self {
            row_impl: RowImpl::Slots,
            case_insensitive: false,
            arraysize: None,
            lowercase_columns: true,
        }
    }
}

impl RowConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given row implementation.
    pub fn with_row_impl(mut self, row_impl: RowImpl) -> Self {
        self.row_impl = row_impl;
        self
    }

    /// Match field names case-insensitively.
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Override the driver's fetch batch size.
    pub fn with_arraysize(mut self, arraysize: usize) -> Self {
        self.arraysize = Some(arraysize);
        self
    }

    /// Parse a TOML document, e.g. a `[rows]` table body.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| Error::config(e.message().to_string()))?;
        config.validate()?;
        tracing::debug!(
            row_impl = ?config.row_impl,
            case_insensitive = config.case_insensitive,
            "row config loaded from toml"
        );
        Ok(config)
    }

    /// Build a configuration from key/value pairs, ignoring unrelated keys.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_ROW_IMPL => config.row_impl = RowImpl::parse(value)?,
                ENV_CASE_INSENSITIVE => {
                    config.case_insensitive = parse_bool(ENV_CASE_INSENSITIVE, value)?
                }
                ENV_LOWERCASE_COLUMNS => {
                    config.lowercase_columns = parse_bool(ENV_LOWERCASE_COLUMNS, value)?
                }
                ENV_ARRAYSIZE => {
                    let size = value.trim().parse::<usize>().map_err(|_| {
                        Error::config(format!(
                            "{ENV_ARRAYSIZE} must be a positive integer, got {value:?}"
                        ))
                    })?;
                    config.arraysize = Some(size);
                }
                _ => {}
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from the process environment.
    ///
    /// Call this once at start-up and pass the result down.
    pub fn from_env() -> Result<Self> {
        let config = Self::from_vars(std::env::vars())?;
        tracing::debug!(
            row_impl = ?config.row_impl,
            case_insensitive = config.case_insensitive,
            arraysize = ?config.arraysize,
            "row config loaded from environment"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.arraysize == Some(0) {
            return Err(Error::config("arraysize must be greater than zero"));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(Error::config(format!("{key} must be a boolean, got {value:?}"))),
    }
}
