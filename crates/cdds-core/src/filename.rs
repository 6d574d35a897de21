//! # Output File Names
//!
//! CMIP output files carry their time coverage in their names:
//!
//! ```text
//! <out_var>_<mip_table>_<model>_<experiment>_<variant>_<grid>_<start>-<end>.nc
//! pr_Amon_UKESM1-0-LL_ssp126_r1i1p1f2_gn_205001-205912.nc
//! ```
//!
//! The stamps name the first and last period in the file, at a precision set
//! by the output frequency. The half-open range a file covers therefore ends
//! one frequency step after its end stamp: `205001-205912` at monthly
//! frequency covers `[2050-01-01, 2060-01-01)`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::temporal::{Frequency, ModelDate, TimeRange};

/// The components of a CMIP output file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFileName {
    /// Output variable name.
    pub out_var_name: String,
    /// MIP table identifier.
    pub mip_table_id: String,
    /// Model identifier.
    pub model_id: String,
    /// Experiment identifier.
    pub experiment_id: String,
    /// Variant label.
    pub variant_label: String,
    /// Grid label.
    pub grid_label: String,
    /// Start stamp, as written.
    pub start_stamp: String,
    /// End stamp, as written.
    pub end_stamp: String,
}

impl OutputFileName {
    /// Parse a bare file name (no directory components).
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidOutputFileName(name.to_string());
        let stem = name.strip_suffix(".nc").ok_or_else(invalid)?;
        let parts: Vec<&str> = stem.split('_').collect();
        let [out_var, table, model, experiment, variant, grid, dates] = parts.as_slice() else {
            return Err(invalid());
        };
        let (start, end) = dates.split_once('-').ok_or_else(invalid)?;
        if [*out_var, *table, *model, *experiment, *variant, *grid, start, end]
            .iter()
            .any(|s| s.is_empty())
        {
            return Err(invalid());
        }
        Ok(Self {
            out_var_name: out_var.to_string(),
            mip_table_id: table.to_string(),
            model_id: model.to_string(),
            experiment_id: experiment.to_string(),
            variant_label: variant.to_string(),
            grid_label: grid.to_string(),
            start_stamp: start.to_string(),
            end_stamp: end.to_string(),
        })
    }

    /// Parse the file name component of a local path or MASS URI.
    pub fn from_path(path: &str) -> Result<Self, ValidationError> {
        Self::parse(base_name(path))
    }

    /// First period in the file.
    pub fn start(&self, frequency: Frequency) -> Result<ModelDate, ValidationError> {
        frequency.parse_stamp(&self.start_stamp)
    }

    /// Last period in the file (its start, not its end).
    pub fn last_period(&self, frequency: Frequency) -> Result<ModelDate, ValidationError> {
        frequency.parse_stamp(&self.end_stamp)
    }
}

/// The final path component of a local path or MASS URI.
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The time range covered by a contiguous set of output files.
///
/// Files are assumed to have passed quality control; gaps between them are
/// not detected. For sub-hourly data the final step is taken from the
/// minutes of the last file's end stamp (the remainder of that hour).
///
/// # Errors
///
/// Returns an error if the list is empty or any name does not parse.
pub fn date_range_of<S: AsRef<str>>(
    files: &[S],
    frequency: Frequency,
) -> Result<TimeRange, ValidationError> {
    let parsed = files
        .iter()
        .map(|f| OutputFileName::from_path(f.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let last = parsed
        .last()
        .ok_or_else(|| ValidationError::NoFiles(frequency.to_string()))?;

    let (step_days, step_seconds) = match frequency.step() {
        Some(step) => step,
        None => {
            let minute = i64::from(last.last_period(frequency)?.minute());
            (0, 60 * (60 - minute))
        }
    };

    let mut covered: Option<TimeRange> = None;
    for name in &parsed {
        let start = name.start(frequency)?;
        let end = name.last_period(frequency)?.shifted(step_days, step_seconds);
        let file_range = TimeRange::new(start, end)?;
        covered = Some(match covered {
            Some(range) => range.hull(&file_range),
            None => file_range,
        });
    }
    covered.ok_or_else(|| ValidationError::NoFiles(frequency.to_string()))
}
