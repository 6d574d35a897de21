//! # Data Versions — Archive Datestamps
//!
//! A `DataVersion` identifies one submission batch for a variable. It is
//! the directory name under each state directory in MASS, so its textual
//! form must be preserved exactly: `v` followed by an eight digit date,
//! e.g. `v20190909`.
//!
//! The fixed-width format makes lexical order equal to chronological
//! order, which is what the derived `Ord` relies on.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const DATESTAMP_FORMAT: &str = "v%Y%m%d";

/// A validated archive datestamp (`vYYYYMMDD`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataVersion(String);

impl DataVersion {
    /// Parse a datestamp string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDatestamp`] if the string is not
    /// `v` followed by a valid `YYYYMMDD` calendar date.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        // chrono accepts non-padded fields, the archive layout does not.
        if s.len() != 9 || !s.starts_with('v') || !s[1..].bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidDatestamp(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATESTAMP_FORMAT)
            .map_err(|_| ValidationError::InvalidDatestamp(s.to_string()))?;
        Ok(Self(s.to_string()))
    }

    /// Build a datestamp from a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!(
            "v{:04}{:02}{:02}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    /// The datestamp for the current UTC date.
    pub fn today() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    /// The calendar date encoded in this datestamp.
    pub fn date(&self) -> NaiveDate {
        // Validated at construction, so the fallback is unreachable.
        NaiveDate::parse_from_str(&self.0, DATESTAMP_FORMAT).unwrap_or_default()
    }

    /// The datestamp as it appears in MASS paths.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DataVersion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DataVersion {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DataVersion> for String {
    fn from(value: DataVersion) -> Self {
        value.0
    }
}

impl std::fmt::Display for DataVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
