//! Named status queries over a board's work items.
//!
//! # Overview
//!
//! A query is a predicate plus an optional parent. A child query only sees
//! the items its parent matched, so queries form a DAG of progressively
//! narrower categories (`not_accepted` → `needs_qe` → `qe_ready` → ...).
//!
//! ## Pipeline
//!
//! ```text
//! BoardSnapshot items
//!        ↓  Universe::build()
//! Universe (sprint / not_accepted / accepted_and_after / requests scopes)
//!        ↓  RunContext::new()
//! RunContext (memo table, processed markers)
//!        ↓  QueryEngine::evaluate() / classify()
//! Partition {matched, unmatched} per query, computed once per run
//! ```
//!
//! `not_<name>` is never declared; it reads the unmatched side of `<name>`'s
//! partition.
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! let engine = QueryEngine::from_config(&config)?;
//! let universe = Universe::from_config(snapshot.items, &config)?.with_requests(snapshot.requests);
//! let mut run = RunContext::new(&universe);
//! let ready = engine.evaluate(&mut run, "qe_ready", true)?;
//! let blocked = engine.evaluate(&mut run, "not_qe_ready", true)?;
//! ```

pub mod engine;
pub mod rules;
pub mod run;
pub mod universe;

pub use engine::{Classification, Predicate, QueryEngine, QueryResult, QuerySpec, classify};
pub use rules::RuleContext;
pub use run::{Partition, RunContext};
pub use universe::{Scope, Universe};
