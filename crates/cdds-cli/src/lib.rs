//! # cdds-cli — CLI for CDDS Archiving
//!
//! Provides the `cdds` command-line interface around the archive
//! state-transition engine.
//!
//! ## Subcommands
//!
//! - `cdds store`: archive every variable in a manifest.
//! - `cdds inspect`: print the archive inventory of each variable.
//!
//! ```bash
//! cdds -v store manifest.yaml --data-version v20200101 --report report.json
//! cdds --simulate store manifest.yaml
//! cdds inspect manifest.yaml --variable Amon/tas
//! ```

pub mod inspect;
pub mod manifest;
pub mod report;
pub mod store;
