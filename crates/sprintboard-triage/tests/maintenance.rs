//! End-to-end maintenance passes over an in-memory board.

use sprintboard_core::SprintError;
use sprintboard_core::config::BoardConfig;
use sprintboard_core::model::{BoardSnapshot, ListRef, WorkItem};
use sprintboard_triage::board::BoardOp;
use sprintboard_triage::{Board, MaintenanceSettings, MemoryBoard, maintain_column};

fn item(id: &str, list: &str, position: f64, labels: &[&str]) -> WorkItem {
    WorkItem::new(id, ListRef::open(list), position).with_labels(labels.iter().copied())
}

fn settings() -> MaintenanceSettings {
    let config = BoardConfig::from_toml_str(
        r#"
default_product = "origin"
product_order = ["origin", "online"]
"#,
    )
    .expect("config");
    MaintenanceSettings::from_config(&config)
}

fn next_column() -> BoardSnapshot {
    BoardSnapshot::new(vec![
        item("a", "Next", 1.0, &["proposed-3.3", "no-qe"]),
        item("b", "Next", 2.0, &["committed-3.1", "committed-origin-3.1"]),
        item("c", "Next", 3.0, &["targeted-online-1.0", "committed-3.2"]),
        item("d", "Next", 4.0, &["docs"]),
        item("e", "Next", 5.0, &["targeted-3.1", "proposed-3.0"]),
        item("elsewhere", "Accepted", 1.0, &["proposed-9.9", "committed-9.9"]),
    ])
}

fn column_ids(board: &MemoryBoard, column: &str) -> Vec<String> {
    board
        .column_items(column)
        .expect("read")
        .into_iter()
        .map(|i| i.id.to_string())
        .collect()
}

#[test]
fn pass_cleans_labels_and_orders_the_column() {
    let mut board = MemoryBoard::new(next_column());

    let report = maintain_column(&mut board, "Next", &settings(), false).expect("pass");

    // Duplicate origin label on b, and the weaker origin label on e.
    let removed: Vec<(&str, &str)> = report
        .labels_removed
        .iter()
        .map(|r| (r.id.as_str(), r.label.as_str()))
        .collect();
    assert_eq!(removed, [("b", "committed-origin-3.1"), ("e", "targeted-3.1")]);
    assert_eq!(
        board.labels_of(&"e".into()).expect("labels"),
        ["proposed-3.0"]
    );

    // Origin governs: e 3.0, b 3.1, c 3.2, a 3.3; d is untagged and stays.
    let order = column_ids(&board, "Next");
    let tagged: Vec<&str> = order
        .iter()
        .map(String::as_str)
        .filter(|id| *id != "d")
        .collect();
    assert_eq!(tagged, ["e", "b", "c", "a"]);
    assert_eq!(report.moves_applied, report.plan.len());

    // Other lists are left alone.
    assert_eq!(
        board.labels_of(&"elsewhere".into()).expect("labels").len(),
        2
    );

    let again = maintain_column(&mut board, "Next", &settings(), false).expect("second pass");
    assert!(again.plan.is_empty());
    assert!(again.labels_removed.is_empty());
}

#[test]
fn transient_failure_aborts_and_a_new_pass_recovers() {
    let mut board = MemoryBoard::new(next_column());
    board.fail_next(BoardOp::MoveBetween);

    let err = maintain_column(&mut board, "Next", &settings(), false).expect_err("move fails");
    assert!(matches!(err, SprintError::Fetch(ref e) if e.operation == "move_between"));
    assert!(err.is_transient());

    let report = maintain_column(&mut board, "Next", &settings(), false).expect("retry");
    assert!(report.labels_removed.is_empty());
    let again = maintain_column(&mut board, "Next", &settings(), false).expect("settled");
    assert!(again.plan.is_empty());
}

#[test]
fn unknown_column_is_a_no_op() {
    let mut board = MemoryBoard::new(next_column());
    let report = maintain_column(&mut board, "Icebox", &settings(), false).expect("pass");
    assert_eq!(report.plan.tagged(), 0);
    assert!(report.plan.is_empty());
    assert_eq!(board.renumbers(), 0);
}

#[test]
fn report_serializes_for_the_cli() {
    let mut board = MemoryBoard::new(next_column());
    let report = maintain_column(&mut board, "Next", &settings(), true).expect("dry run");
    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["column"], "Next");
    assert_eq!(json["dry_run"], true);
    assert!(json["plan"]["moves"].as_array().is_some_and(|m| !m.is_empty()));
}
