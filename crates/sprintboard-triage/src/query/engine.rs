//! Query registry, parent-chain validation, and memoized evaluation.
//!
//! # Edge Direction
//!
//! The validation graph uses edge direction `parent → child`, so a
//! topological order lists every parent before the queries that narrow it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use sprintboard_core::config::BoardConfig;
use sprintboard_core::model::{ItemId, WorkItem};
use sprintboard_core::{FetchError, SprintError};
use tracing::{debug, instrument, warn};

use super::rules::RuleContext;
use super::run::{Partition, RunContext};
use super::universe::{Scope, Universe};

const NEGATION_PREFIX: &str = "not_";

/// Item predicate. Lazily-loaded attributes (comments) may fail to fetch.
///
/// The universe is passed along for rules that look at other items.
pub type Predicate = Box<dyn Fn(&WorkItem, &Universe) -> Result<bool, FetchError> + Send + Sync>;

/// A named query before registration: predicate, parent, root scope.
pub struct QuerySpec {
    predicate: Predicate,
    parent: Option<String>,
    include_backlog: bool,
    scope: Option<Scope>,
}

impl QuerySpec {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&WorkItem) -> Result<bool, FetchError> + Send + Sync + 'static,
    {
        Self::contextual(move |item, _| predicate(item))
    }

    /// A predicate that may inspect the rest of the universe.
    pub fn contextual<F>(predicate: F) -> Self
    where
        F: Fn(&WorkItem, &Universe) -> Result<bool, FetchError> + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            parent: None,
            include_backlog: false,
            scope: None,
        }
    }

    /// Wrap an infallible predicate.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(&WorkItem) -> bool + Send + Sync + 'static,
    {
        Self::new(move |item| Ok(predicate(item)))
    }

    /// Restrict this query's universe to the items `parent` matched.
    ///
    /// `parent` may itself be a `not_` name.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Widen a root query from the sprint to every not-yet-accepted item.
    #[must_use]
    pub const fn include_backlog(mut self, include: bool) -> Self {
        self.include_backlog = include;
        self
    }

    /// Run a root query over `scope`, whatever its backlog flag says.
    #[must_use]
    pub const fn over(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    #[must_use]
    pub const fn includes_backlog(&self) -> bool {
        self.include_backlog
    }

    /// The collection a root query partitions.
    #[must_use]
    pub const fn root_scope(&self) -> Scope {
        match self.scope {
            Some(scope) => scope,
            None if self.include_backlog => Scope::NotAccepted,
            None => Scope::Sprint,
        }
    }
}

impl fmt::Debug for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySpec")
            .field("parent", &self.parent)
            .field("include_backlog", &self.include_backlog)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Ids on each side of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub matched: Vec<ItemId>,
    pub unmatched: Vec<ItemId>,
}

/// Every declared query mapped to its partition.
pub type Classification = BTreeMap<String, QueryResult>;

/// Registered queries, validated to form a DAG over known names.
#[derive(Debug)]
pub struct QueryEngine {
    queries: BTreeMap<String, QuerySpec>,
    /// Declared names, parents before children.
    order: Vec<String>,
}

impl QueryEngine {
    /// Register `queries`, rejecting unknown parents and cyclic parent chains.
    pub fn new(queries: BTreeMap<String, QuerySpec>) -> Result<Self, SprintError> {
        let order = validate(&queries)?;
        Ok(Self { queries, order })
    }

    /// Build an engine from the `[queries]` tables of a board config.
    pub fn from_config(config: &BoardConfig) -> Result<Self, SprintError> {
        let ctx = Arc::new(RuleContext::from_config(config));
        let mut queries = BTreeMap::new();

        for (name, decl) in &config.queries {
            let rule = decl.rule.clone();
            let ctx = Arc::clone(&ctx);
            let include_backlog = decl.include_backlog.unwrap_or(config.include_backlog_default);
            let mut spec = QuerySpec::contextual(move |item, universe| {
                Ok(ctx.matches(&rule, item, universe))
            })
            .include_backlog(include_backlog);
            if let Some(parent) = &decl.parent {
                spec = spec.with_parent(parent.clone());
            }
            if let Some(scope) = decl.scope {
                spec = spec.over(scope);
            }
            queries.insert(name.clone(), spec);
        }

        Self::new(queries)
    }

    /// Declared query names, parents before children.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// True when `name` is declared or is `not_` plus a declared name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        resolve(&self.queries, name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Items on one side of `name`'s partition.
    ///
    /// `matched = true` returns the items the predicate accepted; for a
    /// `not_<q>` name it returns `q`'s rejected items. The partition is
    /// computed at most once per [`RunContext`] unless the context forces
    /// recomputation.
    ///
    /// # Errors
    ///
    /// - [`SprintError::UnknownQuery`] if `name` does not resolve.
    /// - [`SprintError::Fetch`] if a predicate could not load an attribute.
    /// - [`SprintError::QueryPoisoned`] if an earlier attempt in this run
    ///   failed.
    #[instrument(level = "debug", skip(self, run))]
    pub fn evaluate<'u>(
        &self,
        run: &mut RunContext<'u>,
        name: &str,
        matched: bool,
    ) -> Result<Vec<&'u WorkItem>, SprintError> {
        let (base, spec, negated) = resolve(&self.queries, name)
            .ok_or_else(|| SprintError::UnknownQuery(name.to_string()))?;
        let side = matched != negated;

        if run.is_processed(base) && !run.force_recompute() {
            return run.partition(base).map_or_else(
                || Err(SprintError::QueryPoisoned(base.to_string())),
                |partition| {
                    debug!(query = base, "memo hit");
                    Ok(partition.side(side).to_vec())
                },
            );
        }

        let outcome = self.compute(run, spec);
        run.mark_processed(base);
        let partition = outcome.inspect_err(|err| {
            warn!(query = base, error = %err, "query evaluation failed");
        })?;

        debug!(
            query = base,
            matched = partition.matched.len(),
            unmatched = partition.unmatched.len(),
            "query partitioned"
        );
        let result = partition.side(side).to_vec();
        run.store(base, partition);
        Ok(result)
    }

    fn compute<'u>(
        &self,
        run: &mut RunContext<'u>,
        spec: &QuerySpec,
    ) -> Result<Partition<'u>, SprintError> {
        let items = match spec.parent() {
            Some(parent) => self.evaluate(run, parent, true)?,
            None => run.universe().scope(spec.root_scope()),
        };

        let universe = run.universe();
        let mut partition = Partition::default();
        for item in items {
            if (spec.predicate)(item, universe)? {
                partition.matched.push(item);
            } else {
                partition.unmatched.push(item);
            }
        }
        Ok(partition)
    }

    /// Partition every declared query over one fresh run.
    pub fn classify_run(&self, run: &mut RunContext<'_>) -> Result<Classification, SprintError> {
        let mut out = Classification::new();
        for name in &self.order {
            self.evaluate(run, name, true)?;
            let partition = run
                .partition(name)
                .ok_or_else(|| SprintError::QueryPoisoned(name.clone()))?;
            out.insert(
                name.clone(),
                QueryResult {
                    matched: partition.matched.iter().map(|i| i.id.clone()).collect(),
                    unmatched: partition.unmatched.iter().map(|i| i.id.clone()).collect(),
                },
            );
        }
        Ok(out)
    }
}

/// Partition every query in `engine` over `universe`.
pub fn classify(engine: &QueryEngine, universe: &Universe) -> Result<Classification, SprintError> {
    let mut run = RunContext::new(universe);
    engine.classify_run(&mut run)
}

fn resolve<'q>(
    queries: &'q BTreeMap<String, QuerySpec>,
    name: &str,
) -> Option<(&'q str, &'q QuerySpec, bool)> {
    if let Some((key, spec)) = queries.get_key_value(name) {
        return Some((key.as_str(), spec, false));
    }
    let base = name.strip_prefix(NEGATION_PREFIX)?;
    queries
        .get_key_value(base)
        .map(|(key, spec)| (key.as_str(), spec, true))
}

/// Check parents and return declared names in topological order.
fn validate(queries: &BTreeMap<String, QuerySpec>) -> Result<Vec<String>, SprintError> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for name in queries.keys() {
        nodes.insert(name.as_str(), graph.add_node(name.clone()));
    }

    let mut parent_of: HashMap<&str, &str> = HashMap::new();
    for (name, spec) in queries {
        let Some(parent) = spec.parent() else {
            continue;
        };
        let (base, _, _) = resolve(queries, parent)
            .ok_or_else(|| SprintError::UnknownQuery(parent.to_string()))?;
        if base == name {
            return Err(SprintError::QueryCycle {
                path: vec![name.clone(), name.clone()],
            });
        }
        parent_of.insert(name.as_str(), base);
        graph.add_edge(nodes[base], nodes[name.as_str()], ());
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(|idx| graph[idx].clone()).collect()),
        Err(_) => Err(SprintError::QueryCycle {
            path: queries
                .keys()
                .find_map(|name| cycle_from(&parent_of, name))
                .unwrap_or_default(),
        }),
    }
}

/// Follow parent links from `start`; the closed loop if one is reached.
fn cycle_from(parent_of: &HashMap<&str, &str>, start: &str) -> Option<Vec<String>> {
    let mut path: Vec<String> = vec![start.to_string()];
    let mut current = start;
    while let Some(&next) = parent_of.get(current) {
        let seen = path.iter().position(|p| p == next);
        path.push(next.to_string());
        if let Some(first) = seen {
            return Some(path.split_off(first));
        }
        current = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintboard_core::model::ListRef;

    fn engine(specs: Vec<(&str, QuerySpec)>) -> Result<QueryEngine, SprintError> {
        QueryEngine::new(
            specs
                .into_iter()
                .map(|(name, spec)| (name.to_string(), spec))
                .collect(),
        )
    }

    fn always() -> QuerySpec {
        QuerySpec::from_fn(|_| true)
    }

    #[test]
    fn resolves_negated_names() {
        let engine = engine(vec![("accepted", always())]).expect("valid");
        assert!(engine.contains("accepted"));
        assert!(engine.contains("not_accepted"));
        assert!(!engine.contains("not_not_accepted"));
        assert!(!engine.contains("approved"));
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let err = engine(vec![("needs_qe", always().with_parent("not_missing"))])
            .expect_err("unknown parent");
        assert_eq!(err, SprintError::UnknownQuery("not_missing".to_string()));
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let err = engine(vec![("a", always().with_parent("not_a"))]).expect_err("cycle");
        assert_eq!(
            err,
            SprintError::QueryCycle {
                path: vec!["a".to_string(), "a".to_string()]
            }
        );
    }

    #[test]
    fn longer_cycle_reports_its_path() {
        let err = engine(vec![
            ("a", always().with_parent("b")),
            ("b", always().with_parent("not_c")),
            ("c", always().with_parent("a")),
            ("d", always().with_parent("c")),
        ])
        .expect_err("cycle");
        let SprintError::QueryCycle { path } = err else {
            panic!("expected cycle, got {err:?}");
        };
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), path.last());
        for name in ["a", "b", "c"] {
            assert!(path.iter().any(|p| p == name));
        }
    }

    #[test]
    fn names_list_parents_first() {
        let engine = engine(vec![
            ("qe_ready", always().with_parent("needs_qe")),
            ("needs_qe", always().with_parent("not_accepted")),
            ("accepted", always()),
        ])
        .expect("valid");
        let names: Vec<&str> = engine.names().collect();
        let pos = |n: &str| names.iter().position(|x| *x == n).expect("declared");
        assert!(pos("accepted") < pos("needs_qe"));
        assert!(pos("needs_qe") < pos("qe_ready"));
    }

    #[test]
    fn unknown_query_evaluation_fails() {
        let engine = engine(vec![("accepted", always())]).expect("valid");
        let universe = Universe::uniform(vec![WorkItem::new("a", ListRef::open("Next"), 1.0)]);
        let mut run = RunContext::new(&universe);
        let err = engine.evaluate(&mut run, "approved", true).expect_err("unknown");
        assert_eq!(err, SprintError::UnknownQuery("approved".to_string()));
    }

    #[test]
    fn root_scope_prefers_an_explicit_scope() {
        assert_eq!(always().root_scope(), Scope::Sprint);
        assert_eq!(always().include_backlog(true).root_scope(), Scope::NotAccepted);
        assert_eq!(
            always().include_backlog(true).over(Scope::Requests).root_scope(),
            Scope::Requests
        );
    }

    #[test]
    fn contextual_predicates_see_the_whole_universe() {
        let engine = engine(vec![(
            "crowded",
            QuerySpec::contextual(|_, universe| Ok(universe.len() > 1)),
        )])
        .expect("valid");
        let universe = Universe::uniform(vec![
            WorkItem::new("a", ListRef::open("Next"), 1.0),
            WorkItem::new("b", ListRef::open("Next"), 2.0),
        ]);
        let mut run = RunContext::new(&universe);
        assert_eq!(engine.evaluate(&mut run, "crowded", true).expect("ok").len(), 2);
    }

    #[test]
    fn debug_output_omits_the_closure() {
        let rendered = format!("{:?}", always().with_parent("x"));
        assert!(rendered.contains("parent: Some(\"x\")"));
    }
}
