//! Scoping a board's items into the collections queries run over.

use sprintboard_core::SprintError;
pub use sprintboard_core::config::Scope;
use sprintboard_core::config::{BoardConfig, CompiledStates, ListState};
use sprintboard_core::model::WorkItem;
use tracing::debug;

/// Every item fetched for a pass, indexed by scope.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    items: Vec<WorkItem>,
    sprint: Vec<usize>,
    not_accepted: Vec<usize>,
    accepted_and_after: Vec<usize>,
    all: Vec<usize>,
    requests: Vec<usize>,
}

impl Universe {
    /// Scope `items` using the board's list-name sets.
    #[must_use]
    pub fn build(items: Vec<WorkItem>, states: &CompiledStates) -> Self {
        let mut universe = Self {
            items,
            ..Self::default()
        };

        for (idx, item) in universe.items.iter().enumerate() {
            let list = item.list.name.as_str();
            let archived_sprint = states.completed_sprint.is_match(list);

            if states.sets.contains(ListState::Sprint, list) {
                if item.due.is_some() && states.sprint_marker.is_match(&item.name) {
                    continue;
                }
                universe.sprint.push(idx);
                if states.sets.contains(ListState::Accepted, list) {
                    universe.accepted_and_after.push(idx);
                } else {
                    universe.not_accepted.push(idx);
                }
                universe.all.push(idx);
            } else if !item.list.closed && !archived_sprint {
                universe.not_accepted.push(idx);
                universe.all.push(idx);
            } else if archived_sprint {
                universe.accepted_and_after.push(idx);
                universe.all.push(idx);
            }
        }

        debug!(
            items = universe.items.len(),
            sprint = universe.sprint.len(),
            not_accepted = universe.not_accepted.len(),
            accepted_and_after = universe.accepted_and_after.len(),
            "universe scoped"
        );
        universe
    }

    /// Add tracker requests. They only appear in [`Scope::Requests`].
    #[must_use]
    pub fn with_requests(mut self, requests: Vec<WorkItem>) -> Self {
        let start = self.items.len();
        self.items.extend(requests);
        self.requests.extend(start..self.items.len());
        debug!(requests = self.requests.len(), "requests added");
        self
    }

    pub fn from_config(items: Vec<WorkItem>, config: &BoardConfig) -> Result<Self, SprintError> {
        Ok(Self::build(items, &config.states.compile()?))
    }

    /// A universe where every scope holds every item.
    #[must_use]
    pub fn uniform(items: Vec<WorkItem>) -> Self {
        let all: Vec<usize> = (0..items.len()).collect();
        Self {
            items,
            sprint: all.clone(),
            not_accepted: all.clone(),
            accepted_and_after: all.clone(),
            requests: all.clone(),
            all,
        }
    }

    #[must_use]
    pub fn scope(&self, scope: Scope) -> Vec<&WorkItem> {
        self.iter_scope(scope).collect()
    }

    pub fn iter_scope(&self, scope: Scope) -> impl Iterator<Item = &WorkItem> {
        let indices = match scope {
            Scope::Sprint => &self.sprint,
            Scope::NotAccepted => &self.not_accepted,
            Scope::AcceptedAndAfter => &self.accepted_and_after,
            Scope::All => &self.all,
            Scope::Requests => &self.requests,
        };
        indices.iter().map(|&idx| &self.items[idx])
    }

    #[must_use]
    pub fn items(&self) -> &[WorkItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
