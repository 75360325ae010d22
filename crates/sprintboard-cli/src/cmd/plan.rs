//! `sb plan`: show the moves that would put a column in release order.

use crate::output::{OutputMode, fail, pretty_kv, pretty_section, render_mode};
use anyhow::Result;
use clap::Args;
use sprintboard_core::config::BoardConfig;
use sprintboard_core::model::{BoardSnapshot, ItemId};
use sprintboard_triage::maintain::MaintenanceReport;
use sprintboard_triage::{MaintenanceSettings, MemoryBoard, maintain_column};
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Board snapshot (JSON).
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// List (column) to plan.
    #[arg(long, value_name = "NAME")]
    pub column: String,
}

pub fn run_plan(args: &PlanArgs, config: &BoardConfig, output: OutputMode) -> Result<()> {
    let snapshot = BoardSnapshot::load(&args.board)?;
    let mut board = MemoryBoard::new(snapshot);
    let settings = MaintenanceSettings::from_config(config);

    let report = maintain_column(&mut board, &args.column, &settings, true)
        .map_err(|e| fail(output, e))?;

    render_mode(output, &report, write_text, write_pretty)
}

fn bound(id: Option<&ItemId>) -> String {
    id.map_or_else(|| "-".to_string(), ToString::to_string)
}

/// One `strip` line per removed label, then one `move` line per planned move.
pub fn write_text(report: &MaintenanceReport, w: &mut dyn Write) -> std::io::Result<()> {
    for removal in &report.labels_removed {
        writeln!(w, "strip\t{}\t{}", removal.id, removal.label)?;
    }
    for mv in &report.plan {
        writeln!(
            w,
            "move\t{}\t{}\t{}",
            mv.id,
            bound(mv.before.as_ref()),
            bound(mv.after.as_ref())
        )?;
    }
    Ok(())
}

pub fn write_pretty(report: &MaintenanceReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, &format!("Column {}", report.column))?;
    pretty_kv(w, "tagged", report.plan.tagged().to_string())?;
    pretty_kv(w, "in place", report.plan.anchors().to_string())?;
    pretty_kv(w, "moves", report.plan.len().to_string())?;
    if !report.dry_run {
        pretty_kv(w, "applied", report.moves_applied.to_string())?;
    }

    if !report.labels_removed.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Duplicate release labels")?;
        for removal in &report.labels_removed {
            writeln!(w, "  {:<20} ✗ {}", removal.id.as_str(), removal.label)?;
        }
    }

    if report.plan.is_empty() {
        writeln!(w, "\nColumn already in release order.")?;
        return Ok(());
    }

    writeln!(w)?;
    pretty_section(w, "Moves")?;
    for mv in &report.plan {
        writeln!(
            w,
            "  {:<20} after {:<20} before {}",
            mv.id.as_str(),
            bound(mv.before.as_ref()),
            bound(mv.after.as_ref())
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprintboard_core::model::{ListRef, WorkItem};

    fn report() -> MaintenanceReport {
        let snapshot = BoardSnapshot::new(vec![
            WorkItem::new("a", ListRef::open("Next"), 1.0).with_labels(["committed-3.2"]),
            WorkItem::new("b", ListRef::open("Next"), 2.0)
                .with_labels(["committed-3.1", "proposed-3.1"]),
        ]);
        let mut board = MemoryBoard::new(snapshot);
        let settings = MaintenanceSettings::from_config(&BoardConfig::default());
        maintain_column(&mut board, "Next", &settings, true).expect("dry run")
    }

    #[test]
    fn text_lists_strips_then_moves() {
        let mut buf = Vec::new();
        write_text(&report(), &mut buf).expect("write");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "strip\tb\tproposed-3.1\nmove\tb\t-\ta\n"
        );
    }

    #[test]
    fn pretty_mentions_every_move() {
        let mut buf = Vec::new();
        write_pretty(&report(), &mut buf).expect("write");
        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.contains("Column Next"));
        assert!(text.contains("proposed-3.1"));
        assert!(text.contains("Moves"));
    }
}
