//! # Submission Executor
//!
//! Applies a [`SubmissionPlan`] to MASS strictly in order, stopping at the
//! first failed operation. A failure is reported, never raised, so one
//! variable cannot abort a batch run.
//!
//! ## Command mapping
//!
//! | operation           | command                                      |
//! |---------------------|----------------------------------------------|
//! | `MakeDir`           | `moo mkdir -p <dir>` (existing dir is fine)  |
//! | `Put`               | `moo put <local files> <dir>`                |
//! | `Move`              | `moo mv <source>/<file>... <dir>`            |
//! | `RemoveDir`         | `moo rmdir <dir>`                            |
//! | `RecordSuperseded`  | `moo mkdir -p <dir>`, `moo put <note> <dir>` |

use serde::Serialize;

use cdds_core::{MassPath, VariableKey};
use cdds_state::{ArchiveOutcome, MassOperation, RejectionReason, SubmissionPlan};

use crate::command::MassCommand;
use crate::error::MassCommandError;
use crate::inspector::list_records;
use crate::records::empty_dirs;

// ─── Outcomes ────────────────────────────────────────────────────────

/// How a failed operation should be treated by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// MASS could not be reached, refused access, or the local host failed.
    Infrastructure,
    /// The archive was not in the state the plan expected.
    Conflict,
}

/// The result of executing one variable's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Every operation completed.
    Succeeded { outcome: ArchiveOutcome },
    /// The plan was a refusal; nothing was run.
    Rejected { reason: RejectionReason },
    /// An operation failed; the ones after it were not attempted.
    Failed {
        operation_index: usize,
        operation: MassOperation,
        kind: FailureKind,
        message: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

#[derive(Debug, thiserror::Error)]
enum OperationError {
    #[error(transparent)]
    Mass(#[from] MassCommandError),
    #[error("failed to write superseded note: {0}")]
    Note(#[from] std::io::Error),
}

impl OperationError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Mass(e) if e.is_conflict() => FailureKind::Conflict,
            _ => FailureKind::Infrastructure,
        }
    }
}

// ─── Superseded Notes ────────────────────────────────────────────────

/// Name of the note left in a superseded datestamp directory.
pub fn superseded_note_name(variable: &VariableKey) -> String {
    format!(
        "{}_{}_superseded.log",
        variable.mip_table_id(),
        variable.variable_id()
    )
}

/// Text of the superseded note.
pub fn superseded_note(files: &[String], new_location: &MassPath) -> String {
    format!(
        "The following files were moved to a new datestamp when\n\
         further data was appended to this dataset:\n\
         Files moved:\n\
         {}\n\
         New location:\n\
         {new_location}\n",
        files.join("\n")
    )
}

// ─── Executor ────────────────────────────────────────────────────────

/// Writes to MASS through a [`MassCommand`].
pub struct Executor<C> {
    mass: C,
}

impl<C: MassCommand> Executor<C> {
    pub fn new(mass: C) -> Self {
        Self { mass }
    }

    /// Run `plan` against the variable rooted at `variable_root`.
    pub fn execute(&self, variable_root: &MassPath, plan: &SubmissionPlan) -> Outcome {
        if let ArchiveOutcome::Rejected(reason) = plan.outcome {
            return Outcome::Rejected { reason };
        }
        for (index, operation) in plan.operations.iter().enumerate() {
            tracing::info!(variable = %plan.variable, step = index + 1, "{operation}");
            if let Err(err) = self.apply(variable_root, &plan.variable, operation) {
                let kind = err.kind();
                tracing::error!(
                    variable = %plan.variable,
                    operation_index = index,
                    ?kind,
                    error = %err,
                    "archive operation failed"
                );
                return Outcome::Failed {
                    operation_index: index,
                    operation: operation.clone(),
                    kind,
                    message: err.to_string(),
                };
            }
        }
        Outcome::Succeeded {
            outcome: plan.outcome,
        }
    }

    /// Remove every empty directory below `root`, deepest first.
    pub fn remove_empty_dirs(&self, root: &MassPath) -> Result<Vec<String>, MassCommandError> {
        let empty = empty_dirs(&list_records(&self.mass, root)?);
        if empty.is_empty() {
            tracing::debug!(%root, "no empty directories found");
            return Ok(empty);
        }
        tracing::info!(%root, count = empty.len(), "deleting empty directories");
        for dir in &empty {
            self.mass.run(&["rmdir".to_string(), dir.clone()])?;
            tracing::debug!(%dir, "deleted empty directory");
        }
        Ok(empty)
    }

    fn apply(
        &self,
        variable_root: &MassPath,
        variable: &VariableKey,
        operation: &MassOperation,
    ) -> Result<(), OperationError> {
        match operation {
            MassOperation::MakeDir { target } => self.mkdir(&target.resolve(variable_root)),
            MassOperation::Put { target, files } => {
                if files.is_empty() {
                    return Ok(());
                }
                let mut args = vec!["put".to_string()];
                args.extend(files.iter().map(|f| f.display().to_string()));
                args.push(target.resolve(variable_root).to_string());
                self.mass.run(&args)?;
                Ok(())
            }
            MassOperation::Move {
                source,
                target,
                files,
            } => {
                if files.is_empty() {
                    return Ok(());
                }
                let source = source.resolve(variable_root);
                let mut args = vec!["mv".to_string()];
                args.extend(files.iter().map(|f| source.join(f).to_string()));
                args.push(target.resolve(variable_root).to_string());
                self.mass.run(&args)?;
                Ok(())
            }
            MassOperation::RemoveDir { target } => {
                self.mass
                    .run(&["rmdir".to_string(), target.resolve(variable_root).to_string()])?;
                Ok(())
            }
            MassOperation::RecordSuperseded {
                target,
                moved_to,
                files,
            } => {
                let dir = target.resolve(variable_root);
                let note_dir = tempfile::tempdir()?;
                let note_path = note_dir.path().join(superseded_note_name(variable));
                std::fs::write(&note_path, superseded_note(files, &moved_to.resolve(variable_root)))?;
                self.mkdir(&dir)?;
                self.mass
                    .run(&["put".to_string(), note_path.display().to_string(), dir.to_string()])?;
                Ok(())
            }
        }
    }

    fn mkdir(&self, dir: &MassPath) -> Result<(), OperationError> {
        match self
            .mass
            .run(&["mkdir".to_string(), "-p".to_string(), dir.to_string()])
        {
            Ok(_) => Ok(()),
            Err(MassCommandError::AlreadyExists { .. }) => {
                tracing::debug!(%dir, "directory already exists");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_lists_moved_files_and_destination() {
        let dest = MassPath::new("moose:/adhoc/x/Amon/tas/gn/embargoed/v20200101").unwrap();
        let note = superseded_note(&["a.nc".to_string(), "b.nc".to_string()], &dest);
        assert!(note.contains("Files moved:\na.nc\nb.nc\n"));
        assert!(note.ends_with("New location:\nmoose:/adhoc/x/Amon/tas/gn/embargoed/v20200101\n"));
    }

    #[test]
    fn note_name_uses_table_and_variable() {
        let key: VariableKey = "Amon/tas".parse().unwrap();
        assert_eq!(superseded_note_name(&key), "Amon_tas_superseded.log");
    }

    #[test]
    fn io_failures_are_infrastructure() {
        let err = OperationError::Note(std::io::Error::other("disk full"));
        assert_eq!(err.kind(), FailureKind::Infrastructure);
        let conflict = OperationError::Mass(MassCommandError::UserError {
            command: "moo put".to_string(),
            stderr: String::new(),
        });
        assert_eq!(conflict.kind(), FailureKind::Conflict);
    }
}
