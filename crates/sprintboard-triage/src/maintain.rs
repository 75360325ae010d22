//! One maintenance pass over a column: label cleanup, then reordering.

use serde::Serialize;
use sprintboard_core::config::BoardConfig;
use sprintboard_core::model::ItemId;
use sprintboard_core::{FetchError, LabelCodec, ProductOrder, SprintError};
use tracing::{info, instrument, warn};

use crate::board::Board;
use crate::precedence::resolve_labels;
use crate::reorder::{ColumnEntry, SortPlan, plan_reorder};

/// How labels are decoded and which product governs ordering.
#[derive(Debug, Clone)]
pub struct MaintenanceSettings {
    pub codec: LabelCodec,
    pub product_order: ProductOrder,
}

impl MaintenanceSettings {
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            codec: config.codec(),
            product_order: config.product_order(),
        }
    }
}

/// A duplicate release label stripped from an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelRemoval {
    pub id: ItemId,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceReport {
    pub column: String,
    pub dry_run: bool,
    pub labels_removed: Vec<LabelRemoval>,
    pub plan: SortPlan,
    /// Moves written to the board; zero on a dry run.
    pub moves_applied: usize,
}

/// Clean up release labels in `column` and put it in release order.
///
/// Steps: fetch the column, strip duplicate release labels, re-read the live
/// labels, pick each item's dominant tag, plan, apply. Items left without a
/// release tag drop out of the ordering. With `dry_run` nothing is written
/// and the plan is computed from the labels as fetched.
///
/// # Errors
///
/// Collaborator failures propagate as [`SprintError::Fetch`]; moves already
/// written stay written, and a fresh pass picks up from the live board.
#[instrument(skip(board, settings))]
pub fn maintain_column<B: Board + ?Sized>(
    board: &mut B,
    column: &str,
    settings: &MaintenanceSettings,
    dry_run: bool,
) -> Result<MaintenanceReport, SprintError> {
    let items = board.column_items(column)?;

    let mut labels_removed = Vec::new();
    for item in &items {
        let resolution = resolve_labels(&item.labels, &settings.codec);
        for label in resolution.remove {
            warn!(item = %item.id, label = %label, dry_run, "removing duplicate release label");
            if !dry_run {
                board.remove_label(&item.id, &label)?;
            }
            labels_removed.push(LabelRemoval {
                id: item.id.clone(),
                label,
            });
        }
    }

    let mut entries = Vec::with_capacity(items.len());
    for item in &items {
        let labels = if dry_run {
            item.labels.clone()
        } else {
            board.labels_of(&item.id)?
        };
        let tag = resolve_labels(&labels, &settings.codec)
            .dominant(&settings.product_order)
            .cloned();
        entries.push(ColumnEntry::from_item(item, tag));
    }

    let plan = plan_reorder(&entries)?;
    let moves_applied = if dry_run { 0 } else { apply_plan(board, &plan)? };

    info!(
        column,
        items = items.len(),
        labels_removed = labels_removed.len(),
        moves = plan.len(),
        moves_applied,
        "column maintained"
    );

    Ok(MaintenanceReport {
        column: column.to_string(),
        dry_run,
        labels_removed,
        plan,
        moves_applied,
    })
}

/// Write `plan`'s moves in order. Returns how many were written.
pub fn apply_plan<B: Board + ?Sized>(board: &mut B, plan: &SortPlan) -> Result<usize, FetchError> {
    for mv in plan {
        board.move_between(&mv.id, mv.before.as_ref(), mv.after.as_ref())?;
    }
    Ok(plan.len())
}
