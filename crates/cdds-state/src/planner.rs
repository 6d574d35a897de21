//! # Submission Planner
//!
//! Maps (archive inventory, candidate batch) to the MASS operations needed
//! and the outcome they achieve. Planning is pure: it reads its inputs and
//! returns a value. Refusals are returned as `Rejected` plans, never as
//! errors.
//!
//! ## Decision Order
//!
//! Consistency checks run first, then the valid states. The first matching
//! rule wins:
//!
//! 1. more than one Embargoed version: rejected
//! 2. more than one Available version: rejected
//! 3. an Available version carries the candidate's datestamp: rejected
//! 4. a retired version carries the candidate's datestamp: rejected
//! 5. an interrupted fold (Embargoed at the candidate's datestamp, Available
//!    already recorded as superseded): finish moving the Available files
//! 6. one Embargoed version: continue, append or prepend against it
//! 7. one Available version: fold it into a new embargoed version
//! 8. nothing active: first publication, or replacement of withdrawn data
//!
//! Ranges are half-open. A candidate extends existing data only when it
//! starts exactly where that data ends (append) or ends exactly where it
//! starts (prepend). A candidate separated from Embargoed data by a gap is
//! rejected, as is one overlapping Embargoed data under another datestamp:
//! only a same-datestamp continuation may overlap.
//!
//! ## Folding an Available version
//!
//! The superseded note is written before any file leaves the Available
//! directory. An interrupted fold therefore always leaves a Superseded
//! record behind, and re-planning never writes that record twice.

use std::path::PathBuf;

use cdds_core::{DataVersion, StateTransitionError, TimeRange};

use crate::archive_state::ArchiveState;
use crate::inventory::{file_name_of, ArchiveInventory, CandidateBatch, PublishedVersion};
use crate::plan::{ArchiveOutcome, MassOperation, RejectionReason, SubmissionPlan, VersionLocation};

// ─── Planning ────────────────────────────────────────────────────────

/// Plan the submission of `candidate` against the current archive contents.
///
/// # Errors
///
/// Only when the plan would require a lifecycle move the state machine
/// forbids. Every business outcome, including refusal, is an `Ok` plan.
pub fn plan(
    inventory: &ArchiveInventory,
    candidate: &CandidateBatch,
) -> Result<SubmissionPlan, StateTransitionError> {
    let variable = inventory.variable.clone();
    let reject = |reason: RejectionReason| -> Result<SubmissionPlan, StateTransitionError> {
        Ok(SubmissionPlan::rejected(variable.clone(), reason))
    };

    let embargoed = inventory.embargoed();
    let available = inventory.available();

    if embargoed.len() > 1 {
        return reject(RejectionReason::MultipleEmbargoed);
    }
    if available.len() > 1 {
        return reject(RejectionReason::MultipleAvailable);
    }
    if available.iter().any(|a| a.version == candidate.version) {
        return reject(RejectionReason::AlreadyPublished);
    }
    if inventory
        .retired()
        .iter()
        .any(|r| r.version == candidate.version)
    {
        return reject(RejectionReason::DatestampReuse);
    }

    if let ([target], [source]) = (embargoed.as_slice(), available.as_slice()) {
        if target.version == candidate.version && is_recorded_superseded(inventory, source) {
            return resume_fold(inventory, target, source, candidate);
        }
    }
    if let [existing] = embargoed.as_slice() {
        return Ok(plan_against_embargoed(inventory, existing, candidate));
    }
    if let [existing] = available.as_slice() {
        return plan_against_available(inventory, existing, candidate);
    }

    let outcome = if inventory.in_state(ArchiveState::Withdrawn).is_empty() {
        ArchiveOutcome::FirstPublication
    } else {
        ArchiveOutcome::ReplaceWithdrawn
    };
    let target = embargoed_at(&candidate.version);
    Ok(SubmissionPlan {
        variable,
        outcome,
        operations: vec![
            MassOperation::MakeDir {
                target: target.clone(),
            },
            MassOperation::Put {
                target,
                files: candidate.files.clone(),
            },
        ],
        resulting_version: Some(candidate.version.clone()),
        resulting_covers: Some(candidate.covers),
    })
}

// ─── Embargoed Data ──────────────────────────────────────────────────

fn plan_against_embargoed(
    inventory: &ArchiveInventory,
    existing: &PublishedVersion,
    candidate: &CandidateBatch,
) -> SubmissionPlan {
    let variable = inventory.variable.clone();
    let Some(existing_covers) = existing.covers else {
        return SubmissionPlan::rejected(variable, RejectionReason::UnknownCoverage);
    };
    let resulting_covers = Some(existing_covers.hull(&candidate.covers));
    let placement = Placement::of(&candidate.covers, &existing_covers);

    if existing.version == candidate.version {
        let outcome = match placement {
            Placement::Append => ArchiveOutcome::AppendInTime,
            Placement::Prepend => ArchiveOutcome::PrependInTime,
            Placement::Overlap => ArchiveOutcome::ContinueAborted,
            Placement::Gap => {
                return SubmissionPlan::rejected(variable, RejectionReason::TimeGap);
            }
        };
        return SubmissionPlan {
            variable,
            outcome,
            operations: put_missing(&existing.version, missing_files(&[existing], candidate)),
            resulting_version: Some(existing.version.clone()),
            resulting_covers,
        };
    }

    match placement {
        Placement::Append => SubmissionPlan {
            variable,
            outcome: ArchiveOutcome::AppendInTime,
            operations: put_missing(&existing.version, missing_files(&[existing], candidate)),
            resulting_version: Some(existing.version.clone()),
            resulting_covers,
        },
        Placement::Prepend => {
            let target = embargoed_at(&candidate.version);
            SubmissionPlan {
                variable,
                outcome: ArchiveOutcome::PrependInTime,
                operations: vec![
                    MassOperation::MakeDir {
                        target: target.clone(),
                    },
                    MassOperation::Put {
                        target: target.clone(),
                        files: candidate.files.clone(),
                    },
                    MassOperation::Move {
                        source: embargoed_at(&existing.version),
                        target,
                        files: existing.files.clone(),
                    },
                ],
                resulting_version: Some(candidate.version.clone()),
                resulting_covers,
            }
        }
        Placement::Overlap => {
            SubmissionPlan::rejected(variable, RejectionReason::OverlappingTimeRange)
        }
        Placement::Gap => SubmissionPlan::rejected(variable, RejectionReason::TimeGap),
    }
}

// ─── Available Data ──────────────────────────────────────────────────

fn plan_against_available(
    inventory: &ArchiveInventory,
    existing: &PublishedVersion,
    candidate: &CandidateBatch,
) -> Result<SubmissionPlan, StateTransitionError> {
    let variable = inventory.variable.clone();
    let Some(existing_covers) = existing.covers else {
        return Ok(SubmissionPlan::rejected(variable, RejectionReason::UnknownCoverage));
    };
    let outcome = match Placement::of(&candidate.covers, &existing_covers) {
        Placement::Append => ArchiveOutcome::AppendInTime,
        Placement::Prepend => ArchiveOutcome::PrependInTime,
        Placement::Overlap | Placement::Gap => {
            return Ok(SubmissionPlan::rejected(variable, RejectionReason::AlreadyPublished));
        }
    };
    ArchiveState::ensure_transition(ArchiveState::Available, ArchiveState::Superseded)?;

    let source = VersionLocation::new(ArchiveState::Available, existing.version.clone());
    let target = embargoed_at(&candidate.version);
    let mut operations = vec![MassOperation::MakeDir {
        target: target.clone(),
    }];
    if !is_recorded_superseded(inventory, existing) {
        operations.push(MassOperation::RecordSuperseded {
            target: VersionLocation::new(ArchiveState::Superseded, existing.version.clone()),
            moved_to: target.clone(),
            files: existing.files.clone(),
        });
    }
    operations.extend([
        MassOperation::Move {
            source: source.clone(),
            target: target.clone(),
            files: existing.files.clone(),
        },
        MassOperation::RemoveDir { target: source },
        MassOperation::Put {
            target,
            files: candidate.files.clone(),
        },
    ]);
    Ok(SubmissionPlan {
        variable,
        outcome,
        operations,
        resulting_version: Some(candidate.version.clone()),
        resulting_covers: Some(existing_covers.hull(&candidate.covers)),
    })
}

/// Finish a fold that stopped part way through moving the Available files.
///
/// `target` holds the files moved so far, `source` the rest. The candidate
/// is placed against the data of both.
fn resume_fold(
    inventory: &ArchiveInventory,
    target: &PublishedVersion,
    source: &PublishedVersion,
    candidate: &CandidateBatch,
) -> Result<SubmissionPlan, StateTransitionError> {
    let variable = inventory.variable.clone();
    let existing_covers = match (target.covers, source.covers) {
        (Some(moved), Some(remaining)) => moved.hull(&remaining),
        (Some(covers), None) | (None, Some(covers)) => covers,
        (None, None) => {
            return Ok(SubmissionPlan::rejected(variable, RejectionReason::UnknownCoverage));
        }
    };
    let outcome = match Placement::of(&candidate.covers, &existing_covers) {
        Placement::Append => ArchiveOutcome::AppendInTime,
        Placement::Prepend => ArchiveOutcome::PrependInTime,
        Placement::Overlap => ArchiveOutcome::ContinueAborted,
        Placement::Gap => {
            return Ok(SubmissionPlan::rejected(variable, RejectionReason::TimeGap));
        }
    };
    ArchiveState::ensure_transition(ArchiveState::Available, ArchiveState::Superseded)?;

    let source_location = VersionLocation::new(ArchiveState::Available, source.version.clone());
    let mut operations = vec![
        MassOperation::Move {
            source: source_location.clone(),
            target: embargoed_at(&target.version),
            files: source.files.clone(),
        },
        MassOperation::RemoveDir {
            target: source_location,
        },
    ];
    operations.extend(put_missing(
        &target.version,
        missing_files(&[target, source], candidate),
    ));
    Ok(SubmissionPlan {
        variable,
        outcome,
        operations,
        resulting_version: Some(target.version.clone()),
        resulting_covers: Some(existing_covers.hull(&candidate.covers)),
    })
}

fn is_recorded_superseded(inventory: &ArchiveInventory, available: &PublishedVersion) -> bool {
    inventory
        .in_state(ArchiveState::Superseded)
        .iter()
        .any(|s| s.version == available.version)
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Where a candidate lies relative to existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Starts exactly where the existing data ends.
    Append,
    /// Ends exactly where the existing data starts.
    Prepend,
    Overlap,
    /// Apart from the existing data, without touching it.
    Gap,
}

impl Placement {
    fn of(candidate: &TimeRange, existing: &TimeRange) -> Self {
        if candidate.continues(existing) {
            Self::Append
        } else if candidate.leads_into(existing) {
            Self::Prepend
        } else if candidate.overlaps(existing) {
            Self::Overlap
        } else {
            Self::Gap
        }
    }
}

/// Candidate files not already present in any of `existing`.
fn missing_files(existing: &[&PublishedVersion], candidate: &CandidateBatch) -> Vec<PathBuf> {
    candidate
        .files
        .iter()
        .filter(|f| {
            let name = file_name_of(f);
            !existing.iter().any(|e| e.has_file(&name))
        })
        .cloned()
        .collect()
}

fn put_missing(version: &DataVersion, files: Vec<PathBuf>) -> Vec<MassOperation> {
    if files.is_empty() {
        return Vec::new();
    }
    vec![MassOperation::Put {
        target: embargoed_at(version),
        files,
    }]
}

fn embargoed_at(version: &DataVersion) -> VersionLocation {
    VersionLocation::new(ArchiveState::Embargoed, version.clone())
}

// ─── Tests ───────────────────────────────────────────────────────────
