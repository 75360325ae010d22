//! `sb sort`: clean up labels and reorder a column, then save the board.

use crate::cmd::plan::{write_pretty, write_text};
use crate::output::{OutputMode, fail, render_mode};
use anyhow::Result;
use clap::Args;
use sprintboard_core::config::BoardConfig;
use sprintboard_core::model::BoardSnapshot;
use sprintboard_triage::{MaintenanceSettings, MemoryBoard, maintain_column};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub struct SortArgs {
    /// Board snapshot (JSON). Rewritten in place unless `--output` is given.
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// List (column) to sort.
    #[arg(long, value_name = "NAME")]
    pub column: String,

    /// Write the updated snapshot here instead of over `--board`.
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run_sort(args: &SortArgs, config: &BoardConfig, output: OutputMode) -> Result<()> {
    let snapshot = BoardSnapshot::load(&args.board)?;
    let mut board = MemoryBoard::new(snapshot);
    let settings = MaintenanceSettings::from_config(config);

    let report = maintain_column(&mut board, &args.column, &settings, false)
        .map_err(|e| fail(output, e))?;

    let target = args.output.as_ref().unwrap_or(&args.board);
    let renumbers = board.renumbers();
    board.into_snapshot().save(target)?;
    info!(
        path = %target.display(),
        moves = report.moves_applied,
        renumbers,
        "board saved"
    );

    render_mode(output, &report, write_text, write_pretty)
}
