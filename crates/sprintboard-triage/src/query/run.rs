use sprintboard_core::model::WorkItem;
use std::collections::{HashMap, HashSet};

use super::universe::Universe;

/// The two sides of a query over its universe.
///
/// `matched` and `unmatched` are disjoint and together hold exactly the
/// query's universe, in universe order.
#[derive(Debug, Clone, Default)]
pub struct Partition<'u> {
    pub matched: Vec<&'u WorkItem>,
    pub unmatched: Vec<&'u WorkItem>,
}

impl<'u> Partition<'u> {
    #[must_use]
    pub fn side(&self, matched: bool) -> &[&'u WorkItem] {
        if matched { &self.matched } else { &self.unmatched }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matched.len() + self.unmatched.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-pass state: the universe, memoized partitions, and which queries
/// have been attempted.
///
/// One `RunContext` is one pass over a consistent snapshot. Partitions are
/// never reused across contexts.
#[derive(Debug)]
pub struct RunContext<'u> {
    universe: &'u Universe,
    memo: HashMap<String, Partition<'u>>,
    processed: HashSet<String>,
    force_recompute: bool,
}

impl<'u> RunContext<'u> {
    #[must_use]
    pub fn new(universe: &'u Universe) -> Self {
        Self {
            universe,
            memo: HashMap::new(),
            processed: HashSet::new(),
            force_recompute: false,
        }
    }

    /// Recompute partitions on every evaluation instead of reading the memo.
    #[must_use]
    pub const fn with_force_recompute(mut self, force: bool) -> Self {
        self.force_recompute = force;
        self
    }

    #[must_use]
    pub const fn universe(&self) -> &'u Universe {
        self.universe
    }

    #[must_use]
    pub const fn force_recompute(&self) -> bool {
        self.force_recompute
    }

    #[must_use]
    pub fn is_memoized(&self, query: &str) -> bool {
        self.memo.contains_key(query)
    }

    /// True once evaluation of `query` has been attempted, successful or not.
    #[must_use]
    pub fn is_processed(&self, query: &str) -> bool {
        self.processed.contains(query)
    }

    #[must_use]
    pub fn partition(&self, query: &str) -> Option<&Partition<'u>> {
        self.memo.get(query)
    }

    pub(crate) fn mark_processed(&mut self, query: &str) {
        self.processed.insert(query.to_string());
    }

    pub(crate) fn store(&mut self, query: &str, partition: Partition<'u>) {
        self.memo.insert(query.to_string(), partition);
    }
}
