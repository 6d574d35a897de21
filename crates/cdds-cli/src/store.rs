//! # Store Subcommand
//!
//! Archives every variable in a manifest: clean up empty directories,
//! inspect, plan, execute. Variables are processed one at a time and in
//! isolation; a failure for one is logged and recorded, and the run moves on
//! to the next.
//!
//! Exit codes: `0` everything archived, `1` something was rejected or hit a
//! logical conflict, `2` MASS infrastructure failed for at least one
//! variable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use cdds_core::DataVersion;
use cdds_mass::{Executor, InspectError, Inspector, MassCommand, MassConfig};
use cdds_state::{plan, CandidateBatch};

use crate::manifest::{Manifest, VariableEntry};
use crate::report::{RunSummary, VariableReport, VariableStatus};

/// Arguments for the `cdds store` subcommand.
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Manifest listing the variables to archive (YAML, or JSON by extension).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Datestamp for new submissions (vYYYYMMDD). Overrides the manifest;
    /// defaults to today.
    #[arg(long, value_name = "DATESTAMP")]
    pub data_version: Option<String>,

    /// Skip removal of empty directories before inspection.
    #[arg(long)]
    pub no_cleanup: bool,

    /// Write a JSON report of every variable's outcome to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Execute the store subcommand against MASS as configured.
pub fn run_store(args: &StoreArgs, config: &MassConfig) -> Result<u8> {
    let mass = cdds_mass::from_config(config);
    run_store_with(args, &mass)
}

/// Execute the store subcommand through the given command runner.
pub fn run_store_with<C: MassCommand>(args: &StoreArgs, mass: C) -> Result<u8> {
    let manifest = Manifest::load(&args.manifest)?;
    let version = match (&args.data_version, &manifest.data_version) {
        (Some(flag), _) => DataVersion::parse(flag).context("invalid --data-version")?,
        (None, Some(version)) => version.clone(),
        (None, None) => DataVersion::today(),
    };
    tracing::info!(
        manifest = %args.manifest.display(),
        %version,
        variables = manifest.variables.len(),
        "starting archiving"
    );

    let store = Store {
        inspector: Inspector::new(&mass),
        executor: Executor::new(&mass),
        cleanup: !args.no_cleanup,
    };
    let mut summary = RunSummary::default();
    for entry in &manifest.variables {
        let report = store.store_variable(&manifest, entry, &version);
        match report.status {
            VariableStatus::Succeeded => {
                tracing::info!(variable = %report.variable, "{}", report.message)
            }
            _ => tracing::error!(variable = %report.variable, "{}", report.message),
        }
        summary.push(report);
    }

    summary.log();
    if let Some(path) = &args.report {
        summary.write(path)?;
    }
    Ok(summary.exit_code())
}

struct Store<C> {
    inspector: Inspector<C>,
    executor: Executor<C>,
    cleanup: bool,
}

impl<C: MassCommand> Store<C> {
    fn store_variable(
        &self,
        manifest: &Manifest,
        entry: &VariableEntry,
        version: &DataVersion,
    ) -> VariableReport {
        let name = entry.variable.to_string();
        let root = entry.variable_root(&manifest.mass_root);

        let candidate = entry.candidate_files().and_then(|files| {
            CandidateBatch::from_files(version.clone(), files, entry.frequency)
                .context("failed to determine time range of output files")
        });
        let candidate = match candidate {
            Ok(candidate) => candidate,
            Err(e) => {
                return VariableReport::not_run(name, VariableStatus::Infrastructure, format!("{e:#}"))
            }
        };

        if self.cleanup {
            if let Err(e) = self.executor.remove_empty_dirs(&root) {
                return VariableReport::not_run(name, mass_status(e.is_infrastructure()), e.to_string());
            }
        }

        let inventory = match self.inspector.inspect(&root, &entry.variable, entry.frequency) {
            Ok(inventory) => inventory,
            Err(InspectError::Remote(e)) => {
                return VariableReport::not_run(name, mass_status(e.is_infrastructure()), e.to_string())
            }
            Err(e) => return VariableReport::not_run(name, VariableStatus::Rejected, e.to_string()),
        };

        let plan = match plan(&inventory, &candidate) {
            Ok(plan) => plan,
            Err(e) => return VariableReport::not_run(name, VariableStatus::Rejected, e.to_string()),
        };
        tracing::info!(
            variable = %name,
            outcome = plan.outcome.tag(),
            operations = plan.operations.len(),
            "planned submission"
        );

        let outcome = self.executor.execute(&root, &plan);
        VariableReport::from_execution(name, &plan.operations, &outcome)
    }
}

fn mass_status(infrastructure: bool) -> VariableStatus {
    if infrastructure {
        VariableStatus::Infrastructure
    } else {
        VariableStatus::Conflict
    }
}
