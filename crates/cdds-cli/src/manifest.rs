//! # Archive Manifest
//!
//! Lists the variables a run should archive, where their files are and
//! which MASS dataset root they belong under. YAML by default; a `.json`
//! extension selects JSON.
//!
//! ```yaml
//! mass_root: moose:/adhoc/projects/cdds/production/CMIP6/CMIP/MOHC/UKESM1-0-LL/piControl/r1i1p1f2
//! data_version: v20200101        # optional; defaults to today
//! variables:
//!   - variable: Amon/tas
//!     grid_label: gn
//!     frequency: mon
//!     output_dir: /project/cdds/output/Amon/tas
//!   - variable: day/pr
//!     grid_label: gn
//!     frequency: day
//!     files:
//!       - /project/cdds/output/day/pr/pr_day_UKESM1-0-LL_piControl_r1i1p1f2_gn_18500101-18591230.nc
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use cdds_core::{DataVersion, Frequency, MassPath, VariableKey};

/// A run's worth of variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Dataset root in MASS; variables live below it as
    /// `<mip_table_id>/<variable_id>/<grid_label>`.
    pub mass_root: MassPath,
    /// Datestamp for new submissions.
    #[serde(default)]
    pub data_version: Option<DataVersion>,
    pub variables: Vec<VariableEntry>,
}

/// One variable to archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableEntry {
    pub variable: VariableKey,
    pub grid_label: String,
    pub frequency: Frequency,
    /// Explicit list of files to archive.
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Directory whose `.nc` files are archived when `files` is empty.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Manifest {
    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest: Manifest = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse JSON manifest {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("failed to parse YAML manifest {}", path.display()))?
        };
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.variables.is_empty() {
            bail!("manifest lists no variables");
        }
        for entry in &self.variables {
            if entry.grid_label.is_empty() || entry.grid_label.contains('/') {
                bail!("invalid grid label \"{}\" for {}", entry.grid_label, entry.variable);
            }
            if entry.files.is_empty() && entry.output_dir.is_none() {
                bail!("{} has neither files nor output_dir", entry.variable);
            }
        }
        Ok(())
    }
}

impl VariableEntry {
    /// The variable's archive root under `mass_root`.
    pub fn variable_root(&self, mass_root: &MassPath) -> MassPath {
        mass_root.variable_root(&self.variable, &self.grid_label)
    }

    /// Local files to archive, sorted by name.
    pub fn candidate_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = if !self.files.is_empty() {
            self.files.clone()
        } else if let Some(dir) = &self.output_dir {
            list_output_files(dir)?
        } else {
            Vec::new()
        };
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        if files.is_empty() {
            bail!("no output files found for {}", self.variable);
        }
        Ok(files)
    }
}

fn list_output_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read output directory {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read entry in {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "nc") {
            files.push(path);
        }
    }
    Ok(files)
}
