//! The collaborator that owns the remote board.
//!
//! Everything here is I/O from the planner's point of view: reads may fail
//! transiently, and positions read earlier may be stale by the time a move is
//! written. [`Board::move_between`] therefore takes neighbour ids, and the
//! implementation reads their live positions at write time.

pub mod memory;

pub use memory::MemoryBoard;

use std::fmt;

use sprintboard_core::FetchError;
use sprintboard_core::model::{ItemId, WorkItem};

/// Gap left between neighbours after a list is renumbered.
pub const POSITION_STEP: f64 = 16_384.0;

/// Gaps at or below this are too small to split.
pub const MIN_POSITION_GAP: f64 = 1.0 / 64.0;

/// Collaborator operations, named in errors and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardOp {
    ColumnItems,
    LabelsOf,
    MoveBetween,
    AddLabel,
    RemoveLabel,
}

impl BoardOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColumnItems => "column_items",
            Self::LabelsOf => "labels_of",
            Self::MoveBetween => "move_between",
            Self::AddLabel => "add_label",
            Self::RemoveLabel => "remove_label",
        }
    }
}

impl fmt::Display for BoardOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote board access.
pub trait Board {
    /// Items of `column` in current position order.
    fn column_items(&self, column: &str) -> Result<Vec<WorkItem>, FetchError>;

    /// Live labels of one item.
    fn labels_of(&self, id: &ItemId) -> Result<Vec<String>, FetchError>;

    /// Move `id` between `before` and `after`, reading their positions now.
    ///
    /// Returns the position written.
    fn move_between(
        &mut self,
        id: &ItemId,
        before: Option<&ItemId>,
        after: Option<&ItemId>,
    ) -> Result<f64, FetchError>;

    fn add_label(&mut self, id: &ItemId, label: &str) -> Result<(), FetchError>;

    fn remove_label(&mut self, id: &ItemId, label: &str) -> Result<(), FetchError>;
}

/// Midpoint between two live neighbour positions.
///
/// `None` when the gap is too small to split; the caller renumbers the list
/// and asks again.
#[must_use]
pub fn position_between(before: Option<f64>, after: Option<f64>) -> Option<f64> {
    match (before, after) {
        (None, None) => Some(POSITION_STEP),
        (Some(b), None) => Some(b + POSITION_STEP),
        (None, Some(a)) => (a > MIN_POSITION_GAP).then_some(a / 2.0),
        (Some(b), Some(a)) => (a - b > MIN_POSITION_GAP).then(|| b + (a - b) / 2.0),
    }
}
