//! `sb classify`: run the configured status queries over a board snapshot.

use crate::output::{OutputMode, fail, pretty_section, render_mode};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sprintboard_core::config::BoardConfig;
use sprintboard_core::model::{BoardSnapshot, ItemId, WorkItem};
use sprintboard_triage::query::{QueryResult, RunContext};
use sprintboard_triage::{Classification, QueryEngine, Universe};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Board snapshot (JSON) to classify.
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Evaluate one query (`not_<name>` is accepted) instead of all of them.
    #[arg(long, value_name = "NAME")]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct ClassifyOutput(Classification);

pub fn run_classify(args: &ClassifyArgs, config: &BoardConfig, output: OutputMode) -> Result<()> {
    let snapshot = BoardSnapshot::load(&args.board)?;
    let engine = QueryEngine::from_config(config).map_err(|e| fail(output, e))?;
    let universe = Universe::from_config(snapshot.items, config)
        .map_err(|e| fail(output, e))?
        .with_requests(snapshot.requests);

    let classification = match &args.query {
        Some(name) => {
            let mut run = RunContext::new(&universe);
            let matched = engine
                .evaluate(&mut run, name, true)
                .map_err(|e| fail(output, e))?;
            let unmatched = engine
                .evaluate(&mut run, name, false)
                .map_err(|e| fail(output, e))?;
            BTreeMap::from([(
                name.clone(),
                QueryResult {
                    matched: ids(&matched),
                    unmatched: ids(&unmatched),
                },
            )])
        }
        None => sprintboard_triage::classify(&engine, &universe).map_err(|e| fail(output, e))?,
    };

    info!(
        queries = classification.len(),
        items = universe.len(),
        "classification complete"
    );
    render_mode(
        output,
        &ClassifyOutput(classification),
        write_text,
        write_pretty,
    )
}

fn ids(items: &[&WorkItem]) -> Vec<ItemId> {
    items.iter().map(|i| i.id.clone()).collect()
}

fn write_text(out: &ClassifyOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for (name, result) in &out.0 {
        for id in &result.matched {
            writeln!(w, "{name}\t{id}")?;
        }
    }
    Ok(())
}

fn write_pretty(out: &ClassifyOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if out.0.is_empty() {
        writeln!(w, "No queries configured.")?;
        return Ok(());
    }
    for (i, (name, result)) in out.0.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        pretty_section(
            w,
            &format!(
                "{name} ({} matched, {} not)",
                result.matched.len(),
                result.unmatched.len()
            ),
        )?;
        for id in &result.matched {
            writeln!(w, "  {id}")?;
        }
    }
    Ok(())
}
