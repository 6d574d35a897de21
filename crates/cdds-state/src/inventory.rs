//! # Archive Inventory
//!
//! What the archive holds for one variable, and what is about to be added
//! to it. Both are rebuilt for every submission attempt; nothing here is
//! cached between runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cdds_core::{date_range_of, DataVersion, Frequency, TimeRange, ValidationError, VariableKey};

use crate::archive_state::ArchiveState;

/// One datestamped directory present in the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedVersion {
    /// The datestamp directory name.
    pub version: DataVersion,
    /// The state directory the version lives under.
    pub state: ArchiveState,
    /// The time range spanned by the version's output files. `None` when the
    /// directory holds no output files (a superseded version that keeps only
    /// its information note, for instance).
    pub covers: Option<TimeRange>,
    /// Base names of the files present in the directory.
    pub files: Vec<String>,
}

impl PublishedVersion {
    /// A version whose file list and coverage are already known.
    pub fn new(
        version: DataVersion,
        state: ArchiveState,
        covers: Option<TimeRange>,
        files: Vec<String>,
    ) -> Self {
        Self {
            version,
            state,
            covers,
            files,
        }
    }

    /// Build a version from the file names found in its directory. Coverage
    /// is derived from the `.nc` files only.
    pub fn from_files(
        version: DataVersion,
        state: ArchiveState,
        files: Vec<String>,
        frequency: Frequency,
    ) -> Result<Self, ValidationError> {
        let output_files: Vec<&str> = files
            .iter()
            .map(String::as_str)
            .filter(|f| f.ends_with(".nc"))
            .collect();
        let covers = if output_files.is_empty() {
            None
        } else {
            Some(date_range_of(&output_files, frequency)?)
        };
        Ok(Self::new(version, state, covers, files))
    }

    /// Whether a file with this base name is already present.
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }
}

/// Every version found in the archive for one variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveInventory {
    /// The variable the inventory describes.
    pub variable: VariableKey,
    /// Versions, ordered by state then datestamp.
    pub versions: Vec<PublishedVersion>,
}

impl ArchiveInventory {
    pub fn new(variable: VariableKey, mut versions: Vec<PublishedVersion>) -> Self {
        versions.sort_by(|a, b| (a.state, &a.version).cmp(&(b.state, &b.version)));
        Self { variable, versions }
    }

    /// A variable that has never been published.
    pub fn empty(variable: VariableKey) -> Self {
        Self::new(variable, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Versions in one state.
    pub fn in_state(&self, state: ArchiveState) -> Vec<&PublishedVersion> {
        self.versions.iter().filter(|v| v.state == state).collect()
    }

    /// Embargoed and Available versions.
    pub fn active(&self) -> Vec<&PublishedVersion> {
        self.versions.iter().filter(|v| v.state.is_active()).collect()
    }

    /// Withdrawn and Superseded versions.
    pub fn retired(&self) -> Vec<&PublishedVersion> {
        self.versions.iter().filter(|v| !v.state.is_active()).collect()
    }

    pub fn embargoed(&self) -> Vec<&PublishedVersion> {
        self.in_state(ArchiveState::Embargoed)
    }

    pub fn available(&self) -> Vec<&PublishedVersion> {
        self.in_state(ArchiveState::Available)
    }

    /// Every version carrying the given datestamp, in any state.
    pub fn with_version(&self, version: &DataVersion) -> Vec<&PublishedVersion> {
        self.versions.iter().filter(|v| &v.version == version).collect()
    }
}

/// New local files for one variable, ready to ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateBatch {
    /// The datestamp the files would be published under.
    pub version: DataVersion,
    /// The time range the files cover.
    pub covers: TimeRange,
    /// Local paths of the files, in time order.
    pub files: Vec<PathBuf>,
}

impl CandidateBatch {
    /// # Errors
    ///
    /// Returns [`ValidationError::NoFiles`] when `files` is empty.
    pub fn new(
        version: DataVersion,
        covers: TimeRange,
        files: Vec<PathBuf>,
    ) -> Result<Self, ValidationError> {
        if files.is_empty() {
            return Err(ValidationError::NoFiles(version.to_string()));
        }
        Ok(Self {
            version,
            covers,
            files,
        })
    }

    /// Build a batch whose coverage is derived from the file names.
    pub fn from_files(
        version: DataVersion,
        mut files: Vec<PathBuf>,
        frequency: Frequency,
    ) -> Result<Self, ValidationError> {
        files.sort_by(|a, b| file_name_of(a).cmp(&file_name_of(b)));
        let names: Vec<String> = files.iter().map(|f| file_name_of(f)).collect();
        if names.is_empty() {
            return Err(ValidationError::NoFiles(version.to_string()));
        }
        let covers = date_range_of(&names, frequency)?;
        Self::new(version, covers, files)
    }

    /// Base names of the candidate files.
    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| file_name_of(f)).collect()
    }
}

/// The base name of a local path, as it will appear in MASS.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
