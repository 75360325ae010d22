//! JSON board snapshots: the collaborator's view of the board at fetch time.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::item::WorkItem;

/// Every item the collaborator fetched, in no particular order.
///
/// `requests` are bug-tracker entries (RFEs) rather than board cards; their
/// `list` holds the tracker status and they never take part in ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub items: Vec<WorkItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requests: Vec<WorkItem>,
}

impl BoardSnapshot {
    #[must_use]
    pub const fn new(items: Vec<WorkItem>) -> Self {
        Self {
            items,
            requests: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_requests(mut self, requests: Vec<WorkItem>) -> Self {
        self.requests = requests;
        self
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        serde_json::from_str::<Self>(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Items of `column`, ordered by position (ties keep snapshot order).
    #[must_use]
    pub fn column(&self, column: &str) -> Vec<&WorkItem> {
        let mut items: Vec<&WorkItem> = self
            .items
            .iter()
            .filter(|item| item.list.name == column)
            .collect();
        items.sort_by(|a, b| a.position.total_cmp(&b.position));
        items
    }
}
