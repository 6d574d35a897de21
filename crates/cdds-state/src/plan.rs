//! # Submission Plans
//!
//! The output of planning: an ordered list of archive operations plus the
//! outcome they achieve. Operations address datestamp directories relative
//! to the variable's archive root; the executor resolves them to MASS
//! paths. Later operations assume earlier ones completed, so a plan must be
//! applied strictly in order.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use cdds_core::{DataVersion, MassPath, TimeRange, VariableKey};

use crate::archive_state::ArchiveState;

/// A datestamp directory under a state directory: `<state>/<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionLocation {
    pub state: ArchiveState,
    pub version: DataVersion,
}

impl VersionLocation {
    pub fn new(state: ArchiveState, version: DataVersion) -> Self {
        Self { state, version }
    }

    /// The directory below a variable root.
    pub fn resolve(&self, variable_root: &MassPath) -> MassPath {
        variable_root.join(self.state.as_str()).join(self.version.as_str())
    }
}

impl std::fmt::Display for VersionLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.state, self.version)
    }
}

/// One remote mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MassOperation {
    /// Create a datestamp directory (and any missing parents).
    MakeDir { target: VersionLocation },
    /// Upload local files into a datestamp directory.
    Put {
        target: VersionLocation,
        files: Vec<PathBuf>,
    },
    /// Move files, by base name, from one datestamp directory to another.
    Move {
        source: VersionLocation,
        target: VersionLocation,
        files: Vec<String>,
    },
    /// Remove an emptied datestamp directory.
    RemoveDir { target: VersionLocation },
    /// Leave a note in a superseded datestamp directory recording where its
    /// files went.
    RecordSuperseded {
        target: VersionLocation,
        moved_to: VersionLocation,
        files: Vec<String>,
    },
}

impl MassOperation {
    /// Short name for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MakeDir { .. } => "mkdir",
            Self::Put { .. } => "put",
            Self::Move { .. } => "mv",
            Self::RemoveDir { .. } => "rmdir",
            Self::RecordSuperseded { .. } => "record_superseded",
        }
    }

    /// The directory the operation writes to.
    pub fn target(&self) -> &VersionLocation {
        match self {
            Self::MakeDir { target }
            | Self::Put { target, .. }
            | Self::Move { target, .. }
            | Self::RemoveDir { target }
            | Self::RecordSuperseded { target, .. } => target,
        }
    }
}

impl std::fmt::Display for MassOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MakeDir { target } => write!(f, "mkdir {target}"),
            Self::Put { target, files } => write!(f, "put {} file(s) into {target}", files.len()),
            Self::Move {
                source,
                target,
                files,
            } => write!(f, "move {} file(s) from {source} to {target}", files.len()),
            Self::RemoveDir { target } => write!(f, "rmdir {target}"),
            Self::RecordSuperseded { target, moved_to, .. } => {
                write!(f, "record {target} superseded by {moved_to}")
            }
        }
    }
}

/// Why a submission was refused without touching the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// An Available version already exists that the candidate cannot extend.
    AlreadyPublished,
    /// The candidate's datestamp was used by a retired version.
    DatestampReuse,
    /// More than one Embargoed version exists.
    MultipleEmbargoed,
    /// More than one Available version exists.
    MultipleAvailable,
    /// The candidate overlaps an Embargoed version with another datestamp.
    OverlappingTimeRange,
    /// The candidate neither overlaps nor touches the Embargoed data, so
    /// publishing it would leave a hole in the dataset.
    TimeGap,
    /// An active version holds no output files, so its coverage is unknown.
    UnknownCoverage,
}

impl RejectionReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::AlreadyPublished => "data is already in available state",
            Self::DatestampReuse => "trying to publish data with a previously used datestamp",
            Self::MultipleEmbargoed => "data exists in embargoed state with a different datestamp",
            Self::MultipleAvailable => "data exists in available state with more than one datestamp",
            Self::OverlappingTimeRange => {
                "data in embargoed state with a different datestamp overlaps the new time range"
            }
            Self::TimeGap => {
                "new data neither starts where the embargoed data ends nor ends where it starts"
            }
            Self::UnknownCoverage => "an active version holds no output files",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid mass state: {}", self.description())
    }
}

/// The diagnostic result of planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ArchiveOutcome {
    /// Nothing has been published yet.
    FirstPublication,
    /// Resume an earlier, partially-completed submission.
    ContinueAborted,
    /// Extend the active version forwards in time.
    AppendInTime,
    /// Extend the active version backwards in time.
    PrependInTime,
    /// Publish afresh alongside withdrawn versions.
    ReplaceWithdrawn,
    /// Refused; no operations.
    Rejected(RejectionReason),
}

impl ArchiveOutcome {
    /// Stable tag for reports.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::FirstPublication => "first_publication",
            Self::ContinueAborted => "continue_aborted",
            Self::AppendInTime => "append_in_time",
            Self::PrependInTime => "prepend_in_time",
            Self::ReplaceWithdrawn => "replace_withdrawn",
            Self::Rejected(_) => "rejected",
        }
    }

    /// Operator-facing description.
    pub fn description(&self) -> String {
        match self {
            Self::FirstPublication => "publishing data for the first time".to_string(),
            Self::ContinueAborted => "continuing previously aborted archiving".to_string(),
            Self::AppendInTime => "extending embargoed data forwards in time".to_string(),
            Self::PrependInTime => "extending embargoed data backwards in time".to_string(),
            Self::ReplaceWithdrawn => "publishing data to replace withdrawn data".to_string(),
            Self::Rejected(reason) => reason.to_string(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl std::fmt::Display for ArchiveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}

/// What to do for one variable, and where the archive ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPlan {
    pub variable: VariableKey,
    pub outcome: ArchiveOutcome,
    pub operations: Vec<MassOperation>,
    /// The Embargoed datestamp holding the data once the plan has run.
    pub resulting_version: Option<DataVersion>,
    /// The range that datestamp covers once the plan has run.
    pub resulting_covers: Option<TimeRange>,
}

impl SubmissionPlan {
    /// A refusal: no operations and no resulting state.
    pub fn rejected(variable: VariableKey, reason: RejectionReason) -> Self {
        Self {
            variable,
            outcome: ArchiveOutcome::Rejected(reason),
            operations: Vec::new(),
            resulting_version: None,
            resulting_covers: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.operations.is_empty()
    }
}
