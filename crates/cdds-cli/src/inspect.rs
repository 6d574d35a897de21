//! # Inspect Subcommand
//!
//! Prints what MASS holds for the variables in a manifest, as JSON, without
//! changing anything.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cdds_core::VariableKey;
use cdds_mass::{InspectError, Inspector, MassCommand, MassConfig};

use crate::manifest::Manifest;

/// Arguments for the `cdds inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Manifest listing the variables (YAML, or JSON by extension).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Only inspect this variable (`<mip_table_id>/<variable_id>`).
    #[arg(long, value_name = "VARIABLE")]
    pub variable: Option<VariableKey>,
}

/// Execute the inspect subcommand against MASS as configured.
pub fn run_inspect(args: &InspectArgs, config: &MassConfig) -> Result<u8> {
    let mass = cdds_mass::from_config(config);
    let mut stdout = std::io::stdout().lock();
    run_inspect_with(args, &mass, &mut stdout)
}

/// Execute the inspect subcommand, writing the inventories to `out`.
///
/// Returns `2` if any listing failed, `1` if any listing could not be
/// interpreted, `0` otherwise.
pub fn run_inspect_with<C: MassCommand>(
    args: &InspectArgs,
    mass: C,
    out: &mut impl Write,
) -> Result<u8> {
    let manifest = Manifest::load(&args.manifest)?;
    let inspector = Inspector::new(&mass);

    let mut inventories = Vec::new();
    let mut code = 0;
    for entry in &manifest.variables {
        if args.variable.as_ref().is_some_and(|v| v != &entry.variable) {
            continue;
        }
        let root = entry.variable_root(&manifest.mass_root);
        match inspector.inspect(&root, &entry.variable, entry.frequency) {
            Ok(inventory) => inventories.push(inventory),
            Err(InspectError::Remote(e)) => {
                tracing::error!(variable = %entry.variable, error = %e, "failed to list archive");
                code = code.max(if e.is_infrastructure() { 2 } else { 1 });
            }
            Err(e) => {
                tracing::error!(variable = %entry.variable, error = %e, "failed to read archive");
                code = code.max(1);
            }
        }
    }

    serde_json::to_writer_pretty(&mut *out, &inventories)?;
    writeln!(out)?;
    Ok(code)
}
