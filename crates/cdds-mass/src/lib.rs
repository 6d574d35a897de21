//! # cdds-mass — MASS Archive Plumbing
//!
//! The I/O side of CDDS archiving. Planning is pure and lives in
//! `cdds-state`; this crate reads the archive before planning and writes
//! to it afterwards.
//!
//! - **Command** (`command.rs`): the [`MassCommand`] capability, with the
//!   real `moo` runner and a simulation mode.
//! - **Records** (`records.rs`): parsing `moo ls -Rl` output.
//! - **Inspector** (`inspector.rs`): archive listing to `ArchiveInventory`.
//! - **Executor** (`executor.rs`): `SubmissionPlan` to ordered `moo`
//!   commands, with per-operation failure reporting.
//!
//! ## Crate Policy
//!
//! - Every remote call goes through [`MassCommand`]. No shell.
//! - No retries. A failed operation is reported and the next planning
//!   pass resumes from whatever state the archive was left in.
//! - One variable at a time; no shared mutable state between variables.

pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod inspector;
pub mod records;
pub mod testing;

pub use command::{from_config, MassCommand, MooCommand, SimulatedMass};
pub use config::MassConfig;
pub use error::MassCommandError;
pub use executor::{Executor, FailureKind, Outcome};
pub use inspector::{InspectError, Inspector};
pub use records::MassRecord;
