//! In-memory [`Board`] over a [`BoardSnapshot`].

use std::cell::RefCell;
use std::collections::VecDeque;

use sprintboard_core::FetchError;
use sprintboard_core::model::{BoardSnapshot, ItemId, WorkItem};
use tracing::{debug, trace};

use super::{Board, BoardOp, POSITION_STEP, position_between};

/// A board held in memory, for the CLI and tests.
///
/// Behaves like the remote board: positions are floats, a list is renumbered
/// when a gap becomes too small to split, and any operation can be made to
/// fail once with [`MemoryBoard::fail_next`].
#[derive(Debug, Default)]
pub struct MemoryBoard {
    snapshot: BoardSnapshot,
    failures: RefCell<VecDeque<BoardOp>>,
    renumbers: usize,
}

impl MemoryBoard {
    #[must_use]
    pub fn new(snapshot: BoardSnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    /// Make the next call of `op` fail with a transient error.
    ///
    /// Queued failures fire in order; a failure for another op waits.
    pub fn fail_next(&self, op: BoardOp) {
        self.failures.borrow_mut().push_back(op);
    }

    /// How many times a list has been renumbered.
    #[must_use]
    pub const fn renumbers(&self) -> usize {
        self.renumbers
    }

    #[must_use]
    pub const fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn into_snapshot(self) -> BoardSnapshot {
        self.snapshot
    }

    fn check(&self, op: BoardOp) -> Result<(), FetchError> {
        let mut failures = self.failures.borrow_mut();
        if failures.front() == Some(&op) {
            failures.pop_front();
            return Err(FetchError::new(op.as_str(), "injected transient failure"));
        }
        Ok(())
    }

    fn find(&self, op: BoardOp, id: &ItemId) -> Result<&WorkItem, FetchError> {
        self.snapshot
            .items
            .iter()
            .find(|item| item.id == *id)
            .ok_or_else(|| FetchError::new(op.as_str(), format!("no item {id}")))
    }

    fn find_mut(&mut self, op: BoardOp, id: &ItemId) -> Result<&mut WorkItem, FetchError> {
        self.snapshot
            .items
            .iter_mut()
            .find(|item| item.id == *id)
            .ok_or_else(|| FetchError::new(op.as_str(), format!("no item {id}")))
    }

    /// Live position of a neighbour, which must sit in `list`.
    fn neighbour(&self, id: Option<&ItemId>, list: &str) -> Result<Option<f64>, FetchError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let item = self.find(BoardOp::MoveBetween, id)?;
        if item.list.name != list {
            return Err(FetchError::new(
                BoardOp::MoveBetween.as_str(),
                format!("{id} is not in list {list}"),
            ));
        }
        Ok(Some(item.position))
    }

    /// Spread a list's items `POSITION_STEP` apart, keeping their order.
    fn renumber(&mut self, list: &str) {
        let mut indices: Vec<usize> = self
            .snapshot
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.list.name == list)
            .map(|(idx, _)| idx)
            .collect();
        let items = &mut self.snapshot.items;
        indices.sort_by(|&a, &b| items[a].position.total_cmp(&items[b].position));

        let mut position = 0.0;
        for idx in indices {
            position += POSITION_STEP;
            items[idx].position = position;
        }
        self.renumbers += 1;
        debug!(list, "renumbered list");
    }
}

impl Board for MemoryBoard {
    fn column_items(&self, column: &str) -> Result<Vec<WorkItem>, FetchError> {
        self.check(BoardOp::ColumnItems)?;
        Ok(self.snapshot.column(column).into_iter().cloned().collect())
    }

    fn labels_of(&self, id: &ItemId) -> Result<Vec<String>, FetchError> {
        self.check(BoardOp::LabelsOf)?;
        Ok(self.find(BoardOp::LabelsOf, id)?.labels.clone())
    }

    fn move_between(
        &mut self,
        id: &ItemId,
        before: Option<&ItemId>,
        after: Option<&ItemId>,
    ) -> Result<f64, FetchError> {
        self.check(BoardOp::MoveBetween)?;
        let list = self.find(BoardOp::MoveBetween, id)?.list.name.clone();

        let mut renumbered = false;
        let position = loop {
            let lo = self.neighbour(before, &list)?;
            let hi = self.neighbour(after, &list)?;
            if let Some(position) = position_between(lo, hi) {
                break position;
            }
            if renumbered {
                return Err(FetchError::new(
                    BoardOp::MoveBetween.as_str(),
                    format!("no room for {id} between {lo:?} and {hi:?}"),
                ));
            }
            self.renumber(&list);
            renumbered = true;
        };

        self.find_mut(BoardOp::MoveBetween, id)?.position = position;
        trace!(%id, position, "moved item");
        Ok(position)
    }

    fn add_label(&mut self, id: &ItemId, label: &str) -> Result<(), FetchError> {
        self.check(BoardOp::AddLabel)?;
        let item = self.find_mut(BoardOp::AddLabel, id)?;
        if !item.labels.iter().any(|l| l == label) {
            item.labels.push(label.to_string());
        }
        Ok(())
    }

    fn remove_label(&mut self, id: &ItemId, label: &str) -> Result<(), FetchError> {
        self.check(BoardOp::RemoveLabel)?;
        self.find_mut(BoardOp::RemoveLabel, id)?
            .labels
            .retain(|l| l != label);
        Ok(())
    }
}
