//! # Variable Identity
//!
//! The unit of archival granularity is one MIP output variable in one MIP
//! table, written `<mip_table_id>/<variable_id>` (e.g. `Amon/tas`).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A MIP table + variable combination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VariableKey {
    mip_table_id: String,
    variable_id: String,
}

impl VariableKey {
    /// Build a key from its two components.
    ///
    /// # Errors
    ///
    /// Rejects empty components and components containing `/` or whitespace,
    /// since both end up as MASS path segments.
    pub fn new(mip_table_id: &str, variable_id: &str) -> Result<Self, ValidationError> {
        let valid = |s: &str| !s.is_empty() && !s.contains('/') && !s.contains(char::is_whitespace);
        if !valid(mip_table_id) || !valid(variable_id) {
            return Err(ValidationError::InvalidVariableKey(format!(
                "{mip_table_id}/{variable_id}"
            )));
        }
        Ok(Self {
            mip_table_id: mip_table_id.to_string(),
            variable_id: variable_id.to_string(),
        })
    }

    /// MIP table identifier (e.g. `Amon`).
    pub fn mip_table_id(&self) -> &str {
        &self.mip_table_id
    }

    /// Variable identifier (e.g. `tas`).
    pub fn variable_id(&self) -> &str {
        &self.variable_id
    }
}

impl FromStr for VariableKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (table, variable) = s
            .split_once('/')
            .ok_or_else(|| ValidationError::InvalidVariableKey(s.to_string()))?;
        Self::new(table, variable)
    }
}

impl TryFrom<String> for VariableKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VariableKey> for String {
    fn from(value: VariableKey) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for VariableKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.mip_table_id, self.variable_id)
    }
}
