//! # Remote Command Capability
//!
//! Everything this crate does to MASS goes through [`MassCommand`]: run one
//! `moo` sub-command, get its standard output or a classified failure.
//! Commands are argument vectors; nothing is ever passed through a shell.
//!
//! Commands block until `moo` exits. There are no retries here: a failed
//! `put` may have transferred part of its data, and the next planning pass
//! is what resumes it.

use std::path::PathBuf;
use std::process::Command;

use crate::config::MassConfig;
use crate::error::MassCommandError;

/// Run one `moo` sub-command.
pub trait MassCommand {
    /// `args` excludes the `moo` executable itself, e.g. `["ls", "-Rl", uri]`.
    fn run(&self, args: &[String]) -> Result<String, MassCommandError>;
}

impl<T: MassCommand + ?Sized> MassCommand for &T {
    fn run(&self, args: &[String]) -> Result<String, MassCommandError> {
        (**self).run(args)
    }
}

impl<T: MassCommand + ?Sized> MassCommand for Box<T> {
    fn run(&self, args: &[String]) -> Result<String, MassCommandError> {
        (**self).run(args)
    }
}

/// Runs the real `moo` client.
#[derive(Debug, Clone)]
pub struct MooCommand {
    binary: PathBuf,
}

impl MooCommand {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn display(&self, args: &[String]) -> String {
        let mut parts = vec![self.binary.display().to_string()];
        parts.extend(args.iter().cloned());
        parts.join(" ")
    }
}

impl MassCommand for MooCommand {
    fn run(&self, args: &[String]) -> Result<String, MassCommandError> {
        let command = self.display(args);
        tracing::debug!(%command, "running MASS command");
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|source| MassCommandError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            tracing::debug!(%command, output = %stdout, "MASS command succeeded");
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // Killed by a signal: no exit code.
        let code = output.status.code().unwrap_or(-1);
        let err = MassCommandError::from_exit(command, code, stderr);
        if err.is_infrastructure() {
            tracing::error!(error = %err, "MASS command failed");
        } else {
            tracing::debug!(error = %err, "MASS command reported a conflict");
        }
        Err(err)
    }
}

/// Logs commands instead of running them.
///
/// Listings come back empty and every mutation succeeds, so each variable
/// plans as if nothing had been published.
#[derive(Debug, Clone, Default)]
pub struct SimulatedMass;

impl MassCommand for SimulatedMass {
    fn run(&self, args: &[String]) -> Result<String, MassCommandError> {
        tracing::info!(command = %format!("moo {}", args.join(" ")), "simulating MASS command");
        Ok(String::new())
    }
}

/// The command runner a configuration asks for.
pub fn from_config(config: &MassConfig) -> Box<dyn MassCommand> {
    if config.simulate {
        Box::new(SimulatedMass)
    } else {
        Box::new(MooCommand::new(config.moo_binary.clone()))
    }
}
