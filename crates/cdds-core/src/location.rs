//! # MASS Paths
//!
//! Locations in the MASS archive are `moose:` URIs with `/`-separated
//! segments. Below a variable's root the layout is fixed:
//!
//! ```text
//! <variable root>/<state>/<datestamp>/<files>
//! ```
//!
//! and must be preserved exactly for compatibility with existing archives.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::VariableKey;

/// A location in the MASS archive.
///
/// Trailing separators are stripped at construction, so joining and
/// comparing paths is purely textual.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MassPath(String);

impl MassPath {
    /// Validate and normalise a MASS location.
    pub fn new(path: &str) -> Result<Self, ValidationError> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
            return Err(ValidationError::InvalidMassPath(path.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The archive root for one variable of a dataset:
    /// `<dataset root>/<mip_table_id>/<variable_id>/<grid_label>`.
    pub fn variable_root(&self, variable: &VariableKey, grid_label: &str) -> Self {
        self.join(variable.mip_table_id())
            .join(variable.variable_id())
            .join(grid_label)
    }

    /// Append one path segment.
    pub fn join(&self, segment: &str) -> Self {
        Self(format!("{}/{}", self.0, segment.trim_matches('/')))
    }

    /// The parent location, if any.
    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('/')
            .filter(|(parent, _)| !parent.is_empty() && !parent.ends_with(':'))
            .map(|(parent, _)| Self(parent.to_string()))
    }

    /// The final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The location as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MassPath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<MassPath> for String {
    fn from(value: MassPath) -> Self {
        value.0
    }
}

impl std::fmt::Display for MassPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
