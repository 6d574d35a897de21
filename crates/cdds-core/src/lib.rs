//! # cdds-core — Foundational Types for CDDS Archiving
//!
//! The leaf crate of the archiving workspace. It defines the value types the
//! archive state-transition engine is built from. Every other `cdds-*` crate
//! depends on it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for archive primitives.** `DataVersion`,
//!    `VariableKey` and `MassPath` are validated at construction. No bare
//!    strings for datestamps or archive locations.
//!
//! 2. **One model calendar.** Climate model output uses a 360-day calendar.
//!    `ModelDate` encodes it directly, so range arithmetic never goes through
//!    the Gregorian calendar.
//!
//! 3. **Half-open ranges.** `TimeRange` is `[start, end)`. Touching ranges do
//!    not overlap, which is what makes append/prepend decisions unambiguous.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cdds-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod datestamp;
pub mod error;
pub mod filename;
pub mod identity;
pub mod location;
pub mod temporal;

pub use datestamp::DataVersion;
pub use error::{StateTransitionError, ValidationError};
pub use filename::{date_range_of, OutputFileName};
pub use identity::VariableKey;
pub use location::MassPath;
pub use temporal::{Frequency, ModelDate, TimeRange};
