//! Per-variable results and the run's exit code.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use cdds_mass::{FailureKind, Outcome};
use cdds_state::{ArchiveOutcome, MassOperation};

/// How one variable ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableStatus {
    Succeeded,
    Rejected,
    /// A logical conflict surfaced while running or preparing the plan.
    Conflict,
    /// MASS or the local host could not carry out the work.
    Infrastructure,
}

/// One line of the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableReport {
    pub variable: String,
    pub status: VariableStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ArchiveOutcome>,
    pub message: String,
    /// Operations that completed.
    pub operations: Vec<MassOperation>,
}

impl VariableReport {
    /// Report for a plan that was executed (or refused).
    pub fn from_execution(variable: String, planned: &[MassOperation], outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Succeeded { outcome } => Self {
                variable,
                status: VariableStatus::Succeeded,
                outcome: Some(*outcome),
                message: outcome.description(),
                operations: planned.to_vec(),
            },
            Outcome::Rejected { reason } => Self {
                variable,
                status: VariableStatus::Rejected,
                outcome: Some(ArchiveOutcome::Rejected(*reason)),
                message: reason.to_string(),
                operations: Vec::new(),
            },
            Outcome::Failed {
                operation_index,
                operation,
                kind,
                message,
            } => Self {
                variable,
                status: match kind {
                    FailureKind::Infrastructure => VariableStatus::Infrastructure,
                    FailureKind::Conflict => VariableStatus::Conflict,
                },
                outcome: None,
                message: format!("operation {} ({operation}) failed: {message}", operation_index + 1),
                operations: planned[..*operation_index].to_vec(),
            },
        }
    }

    /// Report for a variable that never reached execution.
    pub fn not_run(variable: String, status: VariableStatus, message: String) -> Self {
        Self {
            variable,
            status,
            outcome: None,
            message,
            operations: Vec::new(),
        }
    }
}

/// Every variable's result.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct RunSummary {
    pub variables: Vec<VariableReport>,
}

impl RunSummary {
    pub fn push(&mut self, report: VariableReport) {
        self.variables.push(report);
    }

    fn count(&self, status: VariableStatus) -> usize {
        self.variables.iter().filter(|r| r.status == status).count()
    }

    /// `2` if anything hit an infrastructure failure, `1` if anything was
    /// rejected or conflicted, `0` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.count(VariableStatus::Infrastructure) > 0 {
            2
        } else if self.count(VariableStatus::Rejected) + self.count(VariableStatus::Conflict) > 0 {
            1
        } else {
            0
        }
    }

    pub fn log(&self) {
        tracing::info!(
            total = self.variables.len(),
            succeeded = self.count(VariableStatus::Succeeded),
            rejected = self.count(VariableStatus::Rejected),
            conflict = self.count(VariableStatus::Conflict),
            infrastructure = self.count(VariableStatus::Infrastructure),
            "archiving finished"
        );
    }

    /// Write the report as a JSON array.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize run report")?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write run report {}", path.display()))
    }
}
