//! # Planner Properties
//!
//! Property tests over generated inventories and candidates.

use std::path::PathBuf;

use proptest::prelude::*;

use cdds_core::{DataVersion, TimeRange, VariableKey};
use cdds_state::{
    plan, ArchiveInventory, ArchiveOutcome, ArchiveState, CandidateBatch, MassOperation,
    PublishedVersion, RejectionReason,
};

fn key() -> VariableKey {
    "Amon/tas".parse().unwrap()
}

fn datestamp(day_offset: u32) -> DataVersion {
    let year = 2019 + day_offset / 336;
    let month = 1 + (day_offset / 28) % 12;
    let day = 1 + day_offset % 28;
    DataVersion::parse(&format!("v{year:04}{month:02}{day:02}")).unwrap()
}

/// Decade-long file names starting at `year`.
fn file_names(start_year: i32, end_year: i32) -> Vec<String> {
    (start_year..end_year)
        .step_by(10)
        .map(|y| {
            format!(
                "tas_Amon_UKESM1-0-LL_piControl_r1i1p1f2_gn_{y:04}01-{:04}12.nc",
                y + 9
            )
        })
        .collect()
}

fn decades(start: i32, count: i32) -> TimeRange {
    TimeRange::years(start, start + 10 * count).unwrap()
}

fn candidate(version: DataVersion, start: i32, count: i32) -> CandidateBatch {
    let files = file_names(start, start + 10 * count)
        .into_iter()
        .map(|f| PathBuf::from(format!("/data/{f}")))
        .collect();
    CandidateBatch::new(version, decades(start, count), files).unwrap()
}

fn remote(state: ArchiveState, version: DataVersion, start: i32, count: i32) -> PublishedVersion {
    PublishedVersion::new(
        version,
        state,
        Some(decades(start, count)),
        file_names(start, start + 10 * count),
    )
}

fn decade_start() -> impl Strategy<Value = i32> {
    (185..205i32).prop_map(|d| d * 10)
}

proptest! {
    /// Re-planning after a partial put only ships what is still missing,
    /// and converges to an empty plan once everything is present.
    #[test]
    fn continuation_is_idempotent(
        start in decade_start(),
        count in 2..8i32,
        present in 1..8i32,
        stamp in 0..600u32,
    ) {
        let present = present.min(count - 1);
        let version = datestamp(stamp);
        let all = file_names(start, start + 10 * count);
        let partial = PublishedVersion::new(
            version.clone(),
            ArchiveState::Embargoed,
            Some(decades(start, present)),
            all[..present as usize].to_vec(),
        );
        let batch = candidate(version.clone(), start, count);

        let first = plan(&ArchiveInventory::new(key(), vec![partial.clone()]), &batch).unwrap();
        let second = plan(&ArchiveInventory::new(key(), vec![partial]), &batch).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.operations.len(), 1);
        match &first.operations[0] {
            MassOperation::Put { files, .. } => {
                prop_assert_eq!(files.len(), (count - present) as usize);
            }
            other => prop_assert!(false, "expected put, got {other}"),
        }

        let complete = PublishedVersion::new(
            version,
            ArchiveState::Embargoed,
            Some(decades(start, count)),
            all,
        );
        let third = plan(&ArchiveInventory::new(key(), vec![complete]), &batch).unwrap();
        prop_assert_eq!(third.outcome, ArchiveOutcome::ContinueAborted);
        prop_assert!(third.is_noop());
    }

    /// Appending keeps the embargoed datestamp; prepending produces the
    /// three-step mkdir, put, move sequence and the combined range.
    #[test]
    fn append_and_prepend_are_symmetric(
        start in decade_start(),
        existing_count in 1..5i32,
        new_count in 1..5i32,
        stamps in (0..300u32, 300..600u32),
    ) {
        let existing_version = datestamp(stamps.0);
        let candidate_version = datestamp(stamps.1);
        let inventory = ArchiveInventory::new(
            key(),
            vec![remote(ArchiveState::Embargoed, existing_version.clone(), start, existing_count)],
        );
        let existing_end = start + 10 * existing_count;

        let after = candidate(candidate_version.clone(), existing_end, new_count);
        let appended = plan(&inventory, &after).unwrap();
        prop_assert_eq!(appended.outcome, ArchiveOutcome::AppendInTime);
        prop_assert_eq!(appended.resulting_version.as_ref(), Some(&existing_version));
        prop_assert!(appended.operations.iter().all(|op| op.target().version == existing_version));

        let before_start = start - 10 * new_count;
        let before = candidate(candidate_version.clone(), before_start, new_count);
        let prepended = plan(&inventory, &before).unwrap();
        prop_assert_eq!(prepended.outcome, ArchiveOutcome::PrependInTime);
        let kinds: Vec<&str> = prepended.operations.iter().map(MassOperation::kind).collect();
        prop_assert_eq!(kinds, vec!["mkdir", "put", "mv"]);
        prop_assert_eq!(
            prepended.resulting_covers,
            Some(TimeRange::years(before_start, existing_end).unwrap())
        );
        prop_assert_eq!(prepended.resulting_version, Some(candidate_version));
    }

    /// A candidate separated from active data by a gap never extends it.
    #[test]
    fn gaps_never_extend_active_data(
        start in decade_start(),
        count in 1..4i32,
        gap in 1..5i32,
        after in any::<bool>(),
        available in any::<bool>(),
        stamps in (0..300u32, 300..600u32),
    ) {
        let state = if available { ArchiveState::Available } else { ArchiveState::Embargoed };
        let inventory = ArchiveInventory::new(
            key(),
            vec![remote(state, datestamp(stamps.0), start, count)],
        );
        let candidate_start = if after {
            start + 10 * (count + gap)
        } else {
            start - 10 * (count + gap)
        };
        let result = plan(&inventory, &candidate(datestamp(stamps.1), candidate_start, count)).unwrap();
        let expected = if available {
            RejectionReason::AlreadyPublished
        } else {
            RejectionReason::TimeGap
        };
        prop_assert_eq!(result.outcome, ArchiveOutcome::Rejected(expected));
        prop_assert!(result.is_noop());
    }

    /// A datestamp held by an Available or Superseded version is never
    /// accepted again, whatever the time range.
    #[test]
    fn datestamps_are_unique(
        superseded in any::<bool>(),
        existing_start in decade_start(),
        candidate_start in decade_start(),
        count in 1..5i32,
        stamp in 0..600u32,
    ) {
        let version = datestamp(stamp);
        let state = if superseded { ArchiveState::Superseded } else { ArchiveState::Available };
        let inventory = ArchiveInventory::new(
            key(),
            vec![remote(state, version.clone(), existing_start, count)],
        );
        let outcome = plan(&inventory, &candidate(version, candidate_start, count)).unwrap().outcome;
        prop_assert!(outcome.is_rejected());
    }

    /// With nothing active and only superseded history, any candidate is a
    /// first publication made of exactly mkdir then put.
    #[test]
    fn no_active_version_means_first_publication(
        history in prop::collection::vec((decade_start(), 1..4i32), 0..4),
        candidate_start in decade_start(),
        count in 1..5i32,
    ) {
        let retired: Vec<PublishedVersion> = history
            .iter()
            .enumerate()
            .map(|(i, (start, n))| remote(ArchiveState::Superseded, datestamp(i as u32), *start, *n))
            .collect();
        let inventory = ArchiveInventory::new(key(), retired);
        let result = plan(&inventory, &candidate(datestamp(500), candidate_start, count)).unwrap();
        prop_assert_eq!(result.outcome, ArchiveOutcome::FirstPublication);
        let kinds: Vec<&str> = result.operations.iter().map(MassOperation::kind).collect();
        prop_assert_eq!(kinds, vec!["mkdir", "put"]);
    }

    /// Withdrawn history changes the outcome tag, never the plan's shape.
    #[test]
    fn withdrawn_history_keeps_two_step_plan(
        history in prop::collection::vec((decade_start(), 1..4i32), 1..4),
        candidate_start in decade_start(),
        count in 1..5i32,
    ) {
        let retired: Vec<PublishedVersion> = history
            .iter()
            .enumerate()
            .map(|(i, (start, n))| remote(ArchiveState::Withdrawn, datestamp(i as u32), *start, *n))
            .collect();
        let inventory = ArchiveInventory::new(key(), retired);
        let result = plan(&inventory, &candidate(datestamp(500), candidate_start, count)).unwrap();
        prop_assert_eq!(result.outcome, ArchiveOutcome::ReplaceWithdrawn);
        prop_assert_eq!(result.operations.len(), 2);
    }

    /// Two embargoed versions are always refused.
    #[test]
    fn multiple_embargoed_is_always_rejected(
        a in decade_start(),
        b in decade_start(),
        c in decade_start(),
        stamps in (0..200u32, 200..400u32, 0..600u32),
    ) {
        let inventory = ArchiveInventory::new(
            key(),
            vec![
                remote(ArchiveState::Embargoed, datestamp(stamps.0), a, 1),
                remote(ArchiveState::Embargoed, datestamp(stamps.1), b, 1),
            ],
        );
        let result = plan(&inventory, &candidate(datestamp(stamps.2), c, 2)).unwrap();
        prop_assert_eq!(
            result.outcome,
            ArchiveOutcome::Rejected(RejectionReason::MultipleEmbargoed)
        );
        prop_assert!(result.outcome.to_string().contains("embargoed state with a different datestamp"));
        prop_assert!(result.operations.is_empty());
    }
}
