//! # Archive Inspector
//!
//! Builds an [`ArchiveInventory`] for one variable from a single recursive
//! listing of its archive root:
//!
//! ```text
//! <variable root>/<state>/<datestamp>/<files>
//! ```
//!
//! A root that does not exist yet means the variable was never published,
//! which is an empty inventory rather than an error. Any other listing
//! failure is returned as-is; no partial inventory is synthesized and the
//! query is not retried.

use std::collections::BTreeMap;

use cdds_core::{DataVersion, Frequency, MassPath, ValidationError, VariableKey};
use cdds_state::{ArchiveInventory, ArchiveState, PublishedVersion};

use crate::command::MassCommand;
use crate::error::MassCommandError;
use crate::records::{parse_listing, MassRecord};

/// Why an inventory could not be built.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    /// The listing itself failed.
    #[error("remote query failed: {0}")]
    Remote(#[from] MassCommandError),

    /// The listing named files whose coverage cannot be derived.
    #[error("unreadable archive contents under {root}: {source}")]
    Inventory {
        root: String,
        #[source]
        source: ValidationError,
    },
}

/// List every record below `root`. A missing root lists as empty.
pub fn list_records<C: MassCommand + ?Sized>(
    mass: &C,
    root: &MassPath,
) -> Result<BTreeMap<String, MassRecord>, MassCommandError> {
    let args = vec!["ls".to_string(), "-Rl".to_string(), root.to_string()];
    match mass.run(&args) {
        Ok(stdout) => Ok(parse_listing(&stdout)),
        Err(MassCommandError::NotFound { .. }) => {
            tracing::debug!(%root, "MASS location does not exist");
            Ok(BTreeMap::new())
        }
        Err(e) => Err(e),
    }
}

/// Reads archive state through a [`MassCommand`].
pub struct Inspector<C> {
    mass: C,
}

impl<C: MassCommand> Inspector<C> {
    pub fn new(mass: C) -> Self {
        Self { mass }
    }

    /// Inventory of one variable.
    ///
    /// `frequency` is needed to turn the file names found under each
    /// datestamp into the time range the version covers.
    pub fn inspect(
        &self,
        variable_root: &MassPath,
        variable: &VariableKey,
        frequency: Frequency,
    ) -> Result<ArchiveInventory, InspectError> {
        let records = list_records(&self.mass, variable_root)?;
        let prefix = format!("{variable_root}/");

        let mut contents: BTreeMap<(ArchiveState, DataVersion), Vec<String>> = BTreeMap::new();
        for record in records.values() {
            let Some(relative) = record.path.strip_prefix(&prefix) else {
                continue;
            };
            let segments: Vec<&str> = relative.split('/').collect();
            let Some(state) = ArchiveState::from_name(segments[0]) else {
                if segments.len() == 1 {
                    tracing::warn!(path = %record.path, "ignoring unknown state directory");
                }
                continue;
            };
            let Some(datestamp) = segments.get(1) else {
                continue;
            };
            let version = match DataVersion::parse(datestamp) {
                Ok(version) => version,
                Err(_) => {
                    if segments.len() == 2 {
                        tracing::warn!(path = %record.path, "ignoring non-datestamp directory");
                    }
                    continue;
                }
            };
            let files = contents.entry((state, version)).or_default();
            if let [_, _, file] = segments.as_slice() {
                if !record.is_dir {
                    files.push(file.to_string());
                }
            }
        }

        let mut versions = Vec::new();
        for ((state, version), mut files) in contents {
            if files.is_empty() {
                // Left behind by a move; removed by cleanup.
                tracing::debug!(%state, %version, "skipping empty datestamp directory");
                continue;
            }
            files.sort();
            let published = PublishedVersion::from_files(version, state, files, frequency)
                .map_err(|source| InspectError::Inventory {
                    root: variable_root.to_string(),
                    source,
                })?;
            versions.push(published);
        }

        let inventory = ArchiveInventory::new(variable.clone(), versions);
        tracing::info!(
            variable = %variable,
            versions = inventory.versions.len(),
            active = inventory.active().len(),
            "inspected archive"
        );
        Ok(inventory)
    }
}
