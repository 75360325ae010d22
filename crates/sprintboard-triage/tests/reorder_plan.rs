//! Property tests for column reordering applied through a board.
//!
//! # Acceptance Criteria
//!
//! - Applying a plan leaves tagged items in release order
//! - The number of moves is the tagged count minus the LIS length
//! - Untagged items keep their relative order and stay put
//! - A second pass over the result plans nothing

use std::cmp::Ordering;

use proptest::prelude::*;
use sprintboard_core::compare;
use sprintboard_core::model::{BoardSnapshot, ListRef, WorkItem};
use sprintboard_core::release::{ReleaseState, ReleaseTag, Version};
use sprintboard_triage::maintain::apply_plan;
use sprintboard_triage::reorder::longest_increasing_subsequence;
use sprintboard_triage::{Board, ColumnEntry, MemoryBoard, plan_reorder};

const COLUMN: &str = "Next";

fn tag_for(rank: u8) -> ReleaseTag {
    let state = match rank % 3 {
        0 => ReleaseState::Committed,
        1 => ReleaseState::Targeted,
        _ => ReleaseState::Proposed,
    };
    ReleaseTag::new(state, "core", Version::new(3, u32::from(rank / 3), 0, 0))
}

/// Each slot is an optional rank; positions are spaced by `gap`.
fn board(slots: &[Option<u8>], gap: f64) -> MemoryBoard {
    let items = slots
        .iter()
        .enumerate()
        .map(|(i, rank)| {
            #[allow(clippy::cast_precision_loss)]
            let position = gap * (i + 1) as f64;
            let labels: Vec<String> = rank.map(|r| tag_for(r).to_string()).into_iter().collect();
            WorkItem::new(format!("i{i}"), ListRef::open(COLUMN), position).with_labels(labels)
        })
        .collect();
    MemoryBoard::new(BoardSnapshot::new(items))
}

fn entries(board: &MemoryBoard) -> Vec<ColumnEntry> {
    board
        .column_items(COLUMN)
        .expect("read column")
        .iter()
        .map(|item| {
            let tag = item.labels.first().map(|l| {
                sprintboard_core::decode_label(l, "core").expect("generated label decodes")
            });
            ColumnEntry::from_item(item, tag)
        })
        .collect()
}

fn tags_in_order(entries: &[ColumnEntry]) -> Vec<ReleaseTag> {
    entries.iter().filter_map(|e| e.tag.clone()).collect()
}

fn untagged_ids(entries: &[ColumnEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.tag.is_none())
        .map(|e| e.id.to_string())
        .collect()
}

fn arb_slots(max_len: usize) -> impl Strategy<Value = Vec<Option<u8>>> {
    prop::collection::vec(prop::option::weighted(0.8, 0u8..9), 0..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn applied_plan_sorts_the_column(
        slots in arb_slots(40),
        gap in prop_oneof![Just(1024.0), Just(0.001)],
    ) {
        let mut board = board(&slots, gap);
        let before = entries(&board);
        let plan = plan_reorder(&before).expect("plan");

        // Moves = tagged - LIS(ordinals in target order).
        let mut target: Vec<(usize, ReleaseTag)> = before
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.tag.clone().map(|t| (i, t)))
            .collect();
        target.sort_by(|a, b| compare(&a.1, &b.1));
        let ordinals: Vec<usize> = target.iter().map(|(i, _)| *i).collect();
        let lis = longest_increasing_subsequence(&ordinals).len();
        prop_assert_eq!(plan.len(), target.len() - lis);

        apply_plan(&mut board, &plan).expect("apply");
        let after = entries(&board);

        let tags = tags_in_order(&after);
        prop_assert!(tags.windows(2).all(|w| compare(&w[0], &w[1]) != Ordering::Greater));
        prop_assert_eq!(untagged_ids(&after), untagged_ids(&before));
        prop_assert_eq!(after.len(), before.len());

        let second = plan_reorder(&after).expect("replan");
        prop_assert!(second.is_empty());
    }

    /// Short columns never run out of room, so nothing is renumbered.
    #[test]
    fn untagged_positions_do_not_change(slots in arb_slots(12)) {
        let mut board = board(&slots, 1024.0);
        let before = entries(&board);
        let plan = plan_reorder(&before).expect("plan");
        apply_plan(&mut board, &plan).expect("apply");
        let after = entries(&board);
        prop_assert_eq!(board.renumbers(), 0);

        for e in before.iter().filter(|e| e.tag.is_none()) {
            let moved = after.iter().find(|a| a.id == e.id).expect("still present");
            prop_assert!((moved.position - e.position).abs() < f64::EPSILON);
        }
    }
}

#[test]
fn tight_positions_are_renumbered_on_write() {
    // Items 0.001 apart: splitting any gap needs room first.
    let mut board = board(&[Some(0), Some(2), Some(1)], 0.001);
    let plan = plan_reorder(&entries(&board)).expect("plan");
    assert_eq!(plan.len(), 1);

    apply_plan(&mut board, &plan).expect("apply");
    assert_eq!(board.renumbers(), 1);
    let order: Vec<String> = entries(&board).iter().map(|e| e.id.to_string()).collect();
    assert_eq!(order, ["i0", "i2", "i1"]);
}
