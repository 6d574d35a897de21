//! # Planner Scenarios
//!
//! End-to-end planning cases as an operator meets them: first publication,
//! resuming an aborted run, extending embargoed data in both directions,
//! resubmitting published data, and republishing after a withdrawal.

use std::path::PathBuf;

use cdds_core::{DataVersion, TimeRange, VariableKey};
use cdds_state::{
    plan, ArchiveInventory, ArchiveOutcome, ArchiveState, CandidateBatch, MassOperation,
    PublishedVersion, RejectionReason, VersionLocation,
};

const F1850: &str = "tas_Amon_UKESM1-0-LL_piControl_r1i1p1f2_gn_185001-185912.nc";
const F1860: &str = "tas_Amon_UKESM1-0-LL_piControl_r1i1p1f2_gn_186001-186912.nc";
const F1870: &str = "tas_Amon_UKESM1-0-LL_piControl_r1i1p1f2_gn_187001-187912.nc";
const F1900: &str = "tas_Amon_UKESM1-0-LL_piControl_r1i1p1f2_gn_190001-190912.nc";

fn v(s: &str) -> DataVersion {
    DataVersion::parse(s).unwrap()
}

fn key() -> VariableKey {
    "Amon/tas".parse().unwrap()
}

fn years(a: i32, b: i32) -> TimeRange {
    TimeRange::years(a, b).unwrap()
}

fn local(files: &[&str]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|f| PathBuf::from(format!("/project/cdds/output/ap5/tas/{f}")))
        .collect()
}

fn remote(state: ArchiveState, ds: &str, covers: TimeRange, files: &[&str]) -> PublishedVersion {
    PublishedVersion::new(
        v(ds),
        state,
        Some(covers),
        files.iter().map(|f| f.to_string()).collect(),
    )
}

fn embargoed(ds: &str) -> VersionLocation {
    VersionLocation::new(ArchiveState::Embargoed, v(ds))
}

// =========================================================================
// Scenario A: nothing published yet
// =========================================================================

#[test]
fn first_publication_creates_and_fills_embargoed_directory() {
    let inventory = ArchiveInventory::empty(key());
    let candidate = CandidateBatch::new(v("v20190909"), years(1850, 1860), local(&[F1850])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::FirstPublication);
    assert_eq!(
        plan.operations,
        vec![
            MassOperation::MakeDir {
                target: embargoed("v20190909")
            },
            MassOperation::Put {
                target: embargoed("v20190909"),
                files: local(&[F1850]),
            },
        ]
    );
    assert_eq!(plan.resulting_version, Some(v("v20190909")));
    assert_eq!(plan.resulting_covers, Some(years(1850, 1860)));
}

// =========================================================================
// Scenario B: resuming a partially-completed put
// =========================================================================

#[test]
fn continuation_puts_only_missing_files() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(ArchiveState::Embargoed, "v20190909", years(1850, 1860), &[F1850])],
    );
    let candidate = CandidateBatch::new(
        v("v20190909"),
        years(1850, 1860),
        local(&[F1850, F1860]),
    )
    .unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::ContinueAborted);
    assert_eq!(
        plan.operations,
        vec![MassOperation::Put {
            target: embargoed("v20190909"),
            files: local(&[F1860]),
        }]
    );
}

#[test]
fn continuation_with_everything_present_is_a_noop() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(
            ArchiveState::Embargoed,
            "v20190909",
            years(1850, 1870),
            &[F1850, F1860],
        )],
    );
    let candidate = CandidateBatch::new(
        v("v20190909"),
        years(1850, 1870),
        local(&[F1850, F1860]),
    )
    .unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::ContinueAborted);
    assert!(plan.is_noop());
}

// =========================================================================
// Scenario C: appending to embargoed data under another datestamp
// =========================================================================

#[test]
fn append_reuses_existing_embargoed_datestamp() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(ArchiveState::Embargoed, "v20190909", years(1850, 1860), &[F1850])],
    );
    let candidate = CandidateBatch::new(v("v20191010"), years(1860, 1870), local(&[F1860])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::AppendInTime);
    assert_eq!(
        plan.operations,
        vec![MassOperation::Put {
            target: embargoed("v20190909"),
            files: local(&[F1860]),
        }]
    );
    assert_eq!(plan.resulting_version, Some(v("v20190909")));
    assert_eq!(plan.resulting_covers, Some(years(1850, 1870)));
}

#[test]
fn prepend_creates_new_head_and_moves_existing_files_under_it() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(ArchiveState::Embargoed, "v20190909", years(1860, 1880), &[F1860, F1870])],
    );
    let candidate = CandidateBatch::new(v("v20191010"), years(1850, 1860), local(&[F1850])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::PrependInTime);
    assert_eq!(
        plan.operations,
        vec![
            MassOperation::MakeDir {
                target: embargoed("v20191010")
            },
            MassOperation::Put {
                target: embargoed("v20191010"),
                files: local(&[F1850]),
            },
            MassOperation::Move {
                source: embargoed("v20190909"),
                target: embargoed("v20191010"),
                files: vec![F1860.to_string(), F1870.to_string()],
            },
        ]
    );
    assert_eq!(plan.resulting_covers, Some(years(1850, 1880)));
}

#[test]
fn interrupted_prepend_is_a_consistency_violation() {
    // mkdir and put succeeded, the move did not: two embargoed datestamps.
    let inventory = ArchiveInventory::new(
        key(),
        vec![
            remote(ArchiveState::Embargoed, "v20190909", years(1860, 1870), &[F1860]),
            remote(ArchiveState::Embargoed, "v20191010", years(1850, 1860), &[F1850]),
        ],
    );
    let candidate = CandidateBatch::new(v("v20191010"), years(1850, 1860), local(&[F1850])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(
        plan.outcome,
        ArchiveOutcome::Rejected(RejectionReason::MultipleEmbargoed)
    );
}

#[test]
fn prepend_interrupted_after_partial_put_needs_an_operator() {
    // The new head already holds some candidate files.
    let inventory = ArchiveInventory::new(
        key(),
        vec![
            remote(ArchiveState::Embargoed, "v20190909", years(1870, 1880), &[F1870]),
            remote(ArchiveState::Embargoed, "v20191010", years(1850, 1860), &[F1850]),
        ],
    );
    let candidate = CandidateBatch::new(
        v("v20191010"),
        years(1850, 1870),
        local(&[F1850, F1860]),
    )
    .unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(
        plan.outcome,
        ArchiveOutcome::Rejected(RejectionReason::MultipleEmbargoed)
    );
    assert!(plan.is_noop());
}

#[test]
fn prepend_interrupted_before_put_starts_over() {
    // Only the empty new head exists, and the inventory never lists empty
    // datestamp directories.
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(ArchiveState::Embargoed, "v20190909", years(1860, 1880), &[F1860, F1870])],
    );
    let candidate = CandidateBatch::new(v("v20191010"), years(1850, 1860), local(&[F1850])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::PrependInTime);
    let kinds: Vec<&str> = plan.operations.iter().map(MassOperation::kind).collect();
    assert_eq!(kinds, ["mkdir", "put", "mv"]);
}

// =========================================================================
// Gaps in time
// =========================================================================

#[test]
fn gap_after_embargoed_data_is_rejected() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(ArchiveState::Embargoed, "v20190101", years(1850, 1860), &[F1850])],
    );
    let candidate = CandidateBatch::new(v("v20200101"), years(1900, 1910), local(&[F1900])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::Rejected(RejectionReason::TimeGap));
    assert!(plan.is_noop());
    assert!(plan.outcome.to_string().contains("invalid mass state"));
}

#[test]
fn gap_before_embargoed_data_is_rejected() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(ArchiveState::Embargoed, "v20190101", years(1900, 1910), &[F1900])],
    );
    let candidate = CandidateBatch::new(v("v20200101"), years(1850, 1860), local(&[F1850])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::Rejected(RejectionReason::TimeGap));
}

#[test]
fn gap_after_available_data_is_already_published() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(ArchiveState::Available, "v20190101", years(1850, 1860), &[F1850])],
    );
    let candidate = CandidateBatch::new(v("v20200101"), years(1900, 1910), local(&[F1900])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::Rejected(RejectionReason::AlreadyPublished));
    assert!(plan.outcome.to_string().contains("already in available state"));
    assert!(plan.is_noop());
}

// =========================================================================
// Scenario D: resubmitting published data
// =========================================================================

#[test]
fn resubmitting_available_datestamp_is_rejected() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![remote(ArchiveState::Available, "v20190909", years(1850, 1900), &[F1850])],
    );
    for covers in [years(1850, 1900), years(1900, 1910), years(1800, 1850)] {
        let candidate = CandidateBatch::new(v("v20190909"), covers, local(&[F1900])).unwrap();
        let plan = plan(&inventory, &candidate).unwrap();
        assert!(plan.outcome.is_rejected());
        assert!(plan.operations.is_empty());
        assert!(plan.outcome.to_string().contains("already in available state"));
        assert!(plan.outcome.to_string().contains("invalid mass state"));
    }
}

#[test]
fn superseded_datestamp_is_never_reused() {
    let inventory = ArchiveInventory::new(
        key(),
        vec![
            remote(ArchiveState::Available, "v20191010", years(1850, 1870), &[F1850, F1860]),
            remote(ArchiveState::Superseded, "v20190909", years(1850, 1860), &[F1850]),
        ],
    );
    let candidate = CandidateBatch::new(v("v20190909"), years(1870, 1880), local(&[F1870])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::Rejected(RejectionReason::DatestampReuse));
    assert!(plan
        .outcome
        .to_string()
        .contains("publish data with a previously used datestamp"));
}

// =========================================================================
// Scenario E: republishing after a withdrawal
// =========================================================================

#[test]
fn withdrawn_data_is_replaced_without_touching_it() {
    let withdrawn = remote(ArchiveState::Withdrawn, "v20190909", years(1850, 1900), &[F1850]);
    let inventory = ArchiveInventory::new(key(), vec![withdrawn.clone()]);
    let candidate = CandidateBatch::new(v("v20200101"), years(1900, 1910), local(&[F1900])).unwrap();

    let plan = plan(&inventory, &candidate).unwrap();

    assert_eq!(plan.outcome, ArchiveOutcome::ReplaceWithdrawn);
    assert_eq!(
        plan.operations,
        vec![
            MassOperation::MakeDir {
                target: embargoed("v20200101")
            },
            MassOperation::Put {
                target: embargoed("v20200101"),
                files: local(&[F1900]),
            },
        ]
    );
    let untouched = VersionLocation::new(ArchiveState::Withdrawn, v("v20190909"));
    assert!(plan.operations.iter().all(|op| op.target() != &untouched));
    assert_eq!(inventory.versions, vec![withdrawn]);
}
