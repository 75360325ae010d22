#![forbid(unsafe_code)]
//! sprintboard-triage library.
//!
//! Classification and ordering passes over a board:
//!
//! - [`query`]: named predicates with parent narrowing and per-run memoized
//!   partitions.
//! - [`precedence`]: one authoritative release label per product.
//! - [`reorder`]: minimal-move plans for a column via longest increasing
//!   subsequence.
//! - [`board`]: the collaborator seam to the remote board.
//! - [`maintain`]: precedence, planning and plan application for one column.
//!
//! # Conventions
//!
//! - **Errors**: Return `sprintboard_core::SprintError`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod board;
pub mod maintain;
pub mod precedence;
pub mod query;
pub mod reorder;

pub use board::{Board, MemoryBoard};
pub use maintain::{MaintenanceReport, MaintenanceSettings, maintain_column};
pub use precedence::{LabelResolution, resolve_labels};
pub use query::{Classification, QueryEngine, QuerySpec, RunContext, Universe, classify};
pub use reorder::{ColumnEntry, PlannedMove, SortPlan, plan_reorder};
