//! MASS command failures.
//!
//! `moo` reports the class of failure through its exit code. The classes
//! split into logical conflicts (the archive is not in the state the command
//! expected) and infrastructure failures (the archive could not be reached
//! or refused the request), which the driver reports with different exit
//! codes.

use thiserror::Error;

/// Marker `moo` writes to stderr when the target does not exist.
pub const FILE_DOES_NOT_EXIST: &str = "TSSC_FILE_DOES_NOT_EXIST";

/// A failed MASS command.
#[derive(Error, Debug)]
pub enum MassCommandError {
    /// The target path does not exist.
    #[error("MASS path does not exist: {command}")]
    NotFound { command: String },

    /// The command was malformed or not valid for the target.
    #[error("MASS user error running \"{command}\": {stderr}")]
    UserError { command: String, stderr: String },

    /// The MASS system failed.
    #[error("MASS system error running \"{command}\": {stderr}")]
    SystemError { command: String, stderr: String },

    /// The MASS client failed.
    #[error("MASS client error running \"{command}\": {stderr}")]
    ClientError { command: String, stderr: String },

    /// Access to MASS was refused.
    #[error("MASS access error running \"{command}\": {stderr}")]
    AccessError { command: String, stderr: String },

    /// The directory being created already exists.
    #[error("MASS directory already exists: {command}")]
    AlreadyExists { command: String },

    /// Any other non-zero exit.
    #[error("problem running command \"{command}\" (return code: {code}): {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// The command could not be started at all.
    #[error("failed to run \"{command}\": {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl MassCommandError {
    /// Classify a non-zero `moo` exit.
    pub fn from_exit(command: String, code: i32, stderr: String) -> Self {
        match code {
            2 if stderr.contains(FILE_DOES_NOT_EXIST) => Self::NotFound { command },
            2 => Self::UserError { command, stderr },
            3 => Self::SystemError { command, stderr },
            4 => Self::ClientError { command, stderr },
            5 => Self::AccessError { command, stderr },
            10 => Self::AlreadyExists { command },
            _ => Self::Failed {
                command,
                code,
                stderr,
            },
        }
    }

    /// The archive was not in the state the command expected.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::UserError { .. } | Self::AlreadyExists { .. }
        )
    }

    /// The archive could not be reached or refused the request.
    pub fn is_infrastructure(&self) -> bool {
        !self.is_conflict()
    }
}
