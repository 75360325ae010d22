#![forbid(unsafe_code)]
//! sprintboard-core library.
//!
//! Shared building blocks for the sprintboard workspace: the work-item data
//! model, the release label grammar and its ordering, board configuration,
//! and the error taxonomy.
//!
//! # Conventions
//!
//! - **Errors**: library APIs return [`error::SprintError`]; binaries wrap it
//!   in `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod model;
pub mod release;

pub use error::{ErrorCode, FetchError, SprintError};
pub use model::item::{ItemId, ListRef, WorkItem};
pub use release::codec::{LabelCodec, decode_label};
pub use release::ordering::{ProductOrder, compare};
pub use release::{ReleaseState, ReleaseTag, Version};
