//! MASS client configuration.
//!
//! Names the `moo` binary and whether commands are really run. Defaults
//! suit an operational host; override via environment variables or explicit
//! construction for testing.

use std::path::PathBuf;

/// Configuration for talking to MASS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MassConfig {
    /// The `moo` executable. Default: `moo` on `PATH`.
    pub moo_binary: PathBuf,
    /// Log commands instead of running them.
    pub simulate: bool,
}

impl Default for MassConfig {
    fn default() -> Self {
        Self {
            moo_binary: PathBuf::from("moo"),
            simulate: false,
        }
    }
}

impl MassConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CDDS_MOO_BINARY` (default: `moo`)
    /// - `CDDS_MASS_SIMULATE` (`1`/`true`/`yes` to simulate; default: off)
    pub fn from_env() -> Result<Self, ConfigError> {
        let moo_binary = match std::env::var("CDDS_MOO_BINARY") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::Empty("CDDS_MOO_BINARY".to_string()))
            }
            Ok(value) => PathBuf::from(value),
            Err(_) => PathBuf::from("moo"),
        };
        let simulate = match std::env::var("CDDS_MASS_SIMULATE") {
            Ok(value) => parse_flag("CDDS_MASS_SIMULATE", &value)?,
            Err(_) => false,
        };
        Ok(Self {
            moo_binary,
            simulate,
        })
    }
}

fn parse_flag(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag(var.to_string(), value.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is set but empty")]
    Empty(String),
    #[error("invalid boolean for {0}: {1}")]
    InvalidFlag(String, String),
}
