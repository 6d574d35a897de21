//! # cdds CLI entry point
//!
//! Parses command-line arguments, sets up logging and the MASS
//! configuration, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cdds_cli::inspect::{run_inspect, InspectArgs};
use cdds_cli::store::{run_store, StoreArgs};
use cdds_mass::MassConfig;

/// CDDS archiving
///
/// Moves CMIP output files into the MASS tape archive, deciding per variable
/// whether to publish afresh, resume an aborted run, extend data in time or
/// refuse.
#[derive(Parser, Debug)]
#[command(name = "cdds", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Log MASS commands instead of running them.
    #[arg(long, global = true)]
    simulate: bool,

    /// Path to the moo executable (overrides CDDS_MOO_BINARY).
    #[arg(long, global = true, value_name = "PATH")]
    moo_binary: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Archive the variables listed in a manifest.
    Store(StoreArgs),

    /// Show what MASS holds for the variables listed in a manifest.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = match MassConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::from(2);
        }
    };
    if let Some(binary) = cli.moo_binary {
        config.moo_binary = binary;
    }
    config.simulate |= cli.simulate;
    tracing::debug!(?config, "resolved MASS configuration");

    let result = match cli.command {
        Commands::Store(args) => run_store(&args, &config),
        Commands::Inspect(args) => run_inspect(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
