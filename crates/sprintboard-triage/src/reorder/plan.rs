use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use sprintboard_core::model::{ItemId, WorkItem};
use sprintboard_core::release::ReleaseTag;
use sprintboard_core::{SprintError, compare};
use tracing::{debug, instrument};

use super::lis::longest_increasing_subsequence;

/// One column item as the planner sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEntry {
    pub id: ItemId,
    pub position: f64,
    /// Dominant release tag; `None` excludes the item from the ordering.
    pub tag: Option<ReleaseTag>,
}

impl ColumnEntry {
    pub fn new(id: impl Into<String>, position: f64, tag: Option<ReleaseTag>) -> Self {
        Self {
            id: ItemId::new(id),
            position,
            tag,
        }
    }

    #[must_use]
    pub fn from_item(item: &WorkItem, tag: Option<ReleaseTag>) -> Self {
        Self {
            id: item.id.clone(),
            position: item.position,
            tag,
        }
    }
}

/// Move `id` so that it sits after `before` and ahead of `after`.
///
/// `None` on either side means the start or end of the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub id: ItemId,
    pub before: Option<ItemId>,
    pub after: Option<ItemId>,
}

/// Ordered moves that bring a column into release order.
///
/// Moves must be applied in order: each one may name an earlier mover as
/// its `before` bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortPlan {
    moves: Vec<PlannedMove>,
    tagged: usize,
    anchors: usize,
}

impl SortPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlannedMove> {
        self.moves.iter()
    }

    #[must_use]
    pub fn moves(&self) -> &[PlannedMove] {
        &self.moves
    }

    /// Items that carried a tag and took part in the ordering.
    #[must_use]
    pub const fn tagged(&self) -> usize {
        self.tagged
    }

    /// Tagged items left where they are.
    #[must_use]
    pub const fn anchors(&self) -> usize {
        self.anchors
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PlannedMove> {
        self.moves.iter().find(|m| m.id.as_str() == id)
    }
}

impl<'a> IntoIterator for &'a SortPlan {
    type Item = &'a PlannedMove;
    type IntoIter = std::slice::Iter<'a, PlannedMove>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

/// Plan the fewest moves that put a column's tagged items in release order.
///
/// `entries` must be in current column order: positions non-decreasing, no
/// NaN, ids unique.
///
/// # Errors
///
/// [`SprintError::UnsortedColumn`] or [`SprintError::DuplicateItem`] when the
/// precondition does not hold.
#[instrument(level = "debug", skip(entries), fields(entries = entries.len()))]
pub fn plan_reorder(entries: &[ColumnEntry]) -> Result<SortPlan, SprintError> {
    check_column(entries)?;

    let tagged: Vec<(usize, &ColumnEntry, &ReleaseTag)> = entries
        .iter()
        .enumerate()
        .filter_map(|(ordinal, e)| e.tag.as_ref().map(|tag| (ordinal, e, tag)))
        .collect();

    let in_order = tagged
        .windows(2)
        .all(|w| compare(w[0].2, w[1].2) != Ordering::Greater);
    if in_order {
        debug!(tagged = tagged.len(), "column already in release order");
        return Ok(SortPlan {
            moves: Vec::new(),
            tagged: tagged.len(),
            anchors: tagged.len(),
        });
    }

    let mut target = tagged;
    target.sort_by(|a, b| compare(a.2, b.2));

    let ordinals: Vec<usize> = target.iter().map(|(ordinal, _, _)| *ordinal).collect();
    let mut anchored = vec![false; target.len()];
    let lis = longest_increasing_subsequence(&ordinals);
    for &k in &lis {
        anchored[k] = true;
    }

    // First anchor strictly after each slot in target order.
    let mut next_anchor: Vec<Option<usize>> = vec![None; target.len()];
    let mut upcoming = None;
    for k in (0..target.len()).rev() {
        next_anchor[k] = upcoming;
        if anchored[k] {
            upcoming = Some(k);
        }
    }

    let id_at = |k: usize| target[k].1.id.clone();
    let moves: Vec<PlannedMove> = (0..target.len())
        .filter(|&k| !anchored[k])
        .map(|k| PlannedMove {
            id: id_at(k),
            before: k.checked_sub(1).map(id_at),
            after: next_anchor[k].map(id_at),
        })
        .collect();

    debug!(
        tagged = target.len(),
        anchors = lis.len(),
        moves = moves.len(),
        "planned column reorder"
    );

    Ok(SortPlan {
        moves,
        tagged: target.len(),
        anchors: lis.len(),
    })
}

fn check_column(entries: &[ColumnEntry]) -> Result<(), SprintError> {
    let mut seen: HashSet<&ItemId> = HashSet::with_capacity(entries.len());
    let mut previous: Option<f64> = None;

    for (index, entry) in entries.iter().enumerate() {
        if entry.position.is_nan() || previous.is_some_and(|p| entry.position < p) {
            return Err(SprintError::UnsortedColumn {
                index,
                previous: previous.unwrap_or(f64::NEG_INFINITY),
                current: entry.position,
            });
        }
        if !seen.insert(&entry.id) {
            return Err(SprintError::DuplicateItem(entry.id.to_string()));
        }
        previous = Some(entry.position);
    }
    Ok(())
}
