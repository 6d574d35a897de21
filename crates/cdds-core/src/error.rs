//! # Error Hierarchy
//!
//! Structured error types for the archiving workspace, built with `thiserror`.
//!
//! These errors are reserved for genuinely exceptional input: malformed
//! datestamps, unparseable file names, impossible calendar dates, or a
//! planner asked to emit an illegal lifecycle move. Expected business
//! outcomes such as "already published" are not errors; they are
//! `Rejected` plans in `cdds-state`.

use thiserror::Error;

/// Validation errors for the domain newtypes.
///
/// Each variant carries the offending input so operators can see exactly
/// which datestamp, path or file name was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Datestamp is not of the form `vYYYYMMDD`.
    #[error("invalid datestamp \"{0}\" (expected vYYYYMMDD)")]
    InvalidDatestamp(String),

    /// A date that does not exist on the 360-day model calendar.
    #[error("invalid model date {year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}")]
    InvalidModelDate {
        /// Year component.
        year: i32,
        /// Month component (1-12).
        month: u32,
        /// Day component (1-30).
        day: u32,
        /// Hour component (0-23).
        hour: u32,
        /// Minute component (0-59).
        minute: u32,
    },

    /// A time range whose end does not lie after its start.
    #[error("empty time range [{start}, {end})")]
    EmptyTimeRange {
        /// Range start.
        start: String,
        /// Range end.
        end: String,
    },

    /// Unknown output frequency label.
    #[error("unknown frequency \"{0}\"")]
    UnknownFrequency(String),

    /// File name does not follow the CMIP output file naming convention.
    #[error("invalid output file name \"{0}\"")]
    InvalidOutputFileName(String),

    /// No files were supplied where at least one is required.
    #[error("no output files supplied for {0}")]
    NoFiles(String),

    /// Variable key is not of the form `<mip_table_id>/<variable_id>`.
    #[error("invalid variable key \"{0}\" (expected <mip_table_id>/<variable_id>)")]
    InvalidVariableKey(String),

    /// MASS path is empty or malformed.
    #[error("invalid MASS path \"{0}\"")]
    InvalidMassPath(String),

    /// Unknown archive state directory name.
    #[error("unknown archive state \"{0}\"")]
    UnknownArchiveState(String),
}

/// Errors raised when a lifecycle move is not permitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateTransitionError {
    /// The attempted transition is not in the legality table.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// The current state name.
        from: String,
        /// The attempted target state name.
        to: String,
        /// Human-readable reason for the rejection.
        reason: String,
    },
}
