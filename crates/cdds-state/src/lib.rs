//! # cdds-state — Archive State Machine and Submission Planner
//!
//! Implements the decision core of CDDS archiving:
//!
//! - **Archive State** (`archive_state.rs`): the lifecycle of a datestamped
//!   version in MASS (`Embargoed → Available → Withdrawn / Superseded`) with
//!   an explicit transition-legality table.
//!
//! - **Inventory** (`inventory.rs`): what the archive holds for one
//!   variable, and the candidate batch of local files to add.
//!
//! - **Plan** (`plan.rs`): ordered MASS operations and the outcome they
//!   achieve, including structured rejection reasons.
//!
//! - **Planner** (`planner.rs`): the pure function from inventory and
//!   candidate to plan.
//!
//! ## Crate Policy
//!
//! - No I/O. Inspection and execution live in `cdds-mass`.
//! - Rejections are data. `Err` is reserved for illegal lifecycle moves.

pub mod archive_state;
pub mod inventory;
pub mod plan;
pub mod planner;

pub use archive_state::ArchiveState;
pub use inventory::{file_name_of, ArchiveInventory, CandidateBatch, PublishedVersion};
pub use plan::{ArchiveOutcome, MassOperation, RejectionReason, SubmissionPlan, VersionLocation};
pub use planner::plan;
