pub mod classify;
pub mod completions;
pub mod decode;
pub mod plan;
pub mod sort;

use anyhow::Result;
use sprintboard_core::config::{BoardConfig, resolve_config};
use std::path::Path;
use tracing::debug;

/// Resolve the effective board config for a command.
pub fn load_config(explicit: Option<&Path>, project_root: &Path) -> Result<BoardConfig> {
    let (config, source) = resolve_config(explicit, project_root)?;
    debug!(?source, queries = config.queries.len(), "config resolved");
    Ok(config)
}
