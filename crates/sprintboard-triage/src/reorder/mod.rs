//! Minimal-move reordering of a column by release tag.
//!
//! # Overview
//!
//! Items in a column should appear in [`compare`](sprintboard_core::compare)
//! order of their dominant release tag. Rewriting every position would churn
//! the remote board, so the planner keeps the longest run of items that is
//! already in order (the LIS of their current ordinals taken in target order)
//! and moves only the rest.
//!
//! Each planned move names neighbour bounds, not a position. The collaborator
//! computes the numeric position from the live neighbours at write time,
//! because the remote side may renumber a list between planning and writing.

pub mod lis;
pub mod plan;

pub use lis::longest_increasing_subsequence;
pub use plan::{ColumnEntry, PlannedMove, SortPlan, plan_reorder};
