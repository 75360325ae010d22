//! Work items as seen through the board collaborator.

pub mod item;
pub mod snapshot;

pub use item::{ItemId, ListRef, WorkItem};
pub use snapshot::BoardSnapshot;
