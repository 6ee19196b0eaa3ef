mod common;

use common::create_seeded_db;
use quarry_core::{ColumnValue, Connection, Outcome, QuarryError, StatementState};

#[test]
fn test_prepare_returns_tail() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let sql = "SELECT 1; SELECT 2;";

    let (first, tail) = conn.prepare(sql).expect("Failed to prepare first");
    assert!(first.sql().expect("Failed to read sql").starts_with("SELECT 1"));
    let (second, tail) = conn.prepare(tail).expect("Failed to prepare second");
    assert!(second.sql().expect("Failed to read sql").trim().starts_with("SELECT 2"));
    assert!(tail.trim().is_empty());
}

#[test]
fn test_step_to_completion() {
    let conn = create_seeded_db();
    let (mut stmt, _) = conn
        .prepare("SELECT name FROM items ORDER BY id")
        .expect("Failed to prepare");

    let mut names = Vec::new();
    while stmt.step().expect("Failed to step") == Outcome::Row {
        names.push(stmt.read_text(1).expect("Failed to read").unwrap_or_default());
    }

    assert_eq!(names, vec!["apple", "pear"]);
    assert_eq!(stmt.state(), StatementState::Done);
    assert_eq!(stmt.finalize().expect("Failed to finalize"), Outcome::Ok);
}

#[test]
fn test_reset_keeps_bindings() {
    let conn = create_seeded_db();
    let (mut stmt, _) = conn
        .prepare("SELECT name FROM items WHERE id = ?")
        .expect("Failed to prepare");

    stmt.bind(1usize, 2i64).expect("Failed to bind");
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Row);
    assert_eq!(stmt.read_text(1).unwrap().as_deref(), Some("pear"));

    assert_eq!(stmt.reset().expect("Failed to reset"), Outcome::Ok);
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Row);
    assert_eq!(stmt.read_text(1).unwrap().as_deref(), Some("pear"));

    stmt.reset().expect("Failed to reset");
    stmt.clear_bindings().expect("Failed to clear bindings");
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Done);
}

#[test]
fn test_finalize_lifecycle() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let (mut stmt, _) = conn.prepare("SELECT ?").expect("Failed to prepare");

    assert_eq!(stmt.finalize().expect("Failed to finalize"), Outcome::Ok);

    assert!(matches!(
        stmt.finalize(),
        Err(QuarryError::Lifecycle { operation: "finalize", .. })
    ));
    assert!(matches!(stmt.bind(1usize, 1i64), Err(QuarryError::Lifecycle { .. })));
    assert!(matches!(stmt.step(), Err(QuarryError::Lifecycle { .. })));
    assert!(matches!(stmt.column_count(), Err(QuarryError::Lifecycle { .. })));
    assert!(matches!(stmt.sql(), Err(QuarryError::Lifecycle { .. })));
}

#[test]
fn test_reads_require_a_row() {
    let conn = create_seeded_db();
    let (mut stmt, _) = conn
        .prepare("SELECT name FROM items WHERE id < 0")
        .expect("Failed to prepare");

    assert!(matches!(
        stmt.read_int(1),
        Err(QuarryError::Lifecycle { state: "prepared", .. })
    ));
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Done);
    assert!(matches!(
        stmt.read_value(1),
        Err(QuarryError::Lifecycle { state: "done", .. })
    ));
}

#[test]
fn test_step_failure_is_an_outcome() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    conn.execute("CREATE TABLE t(a NOT NULL)")
        .expect("Failed to create table");
    let (mut stmt, _) = conn
        .prepare("INSERT INTO t VALUES (NULL)")
        .expect("Failed to prepare");

    assert_eq!(stmt.step().expect("Step itself should not raise"), Outcome::Constraint);
    assert_eq!(stmt.state(), StatementState::Prepared);
    assert!(conn.last_error_message().contains("NOT NULL"));
}

#[test]
fn test_statements_are_independent() {
    let conn = create_seeded_db();
    let (mut names, _) = conn
        .prepare("SELECT name FROM items ORDER BY id")
        .expect("Failed to prepare names");
    let (mut prices, _) = conn
        .prepare("SELECT price FROM items ORDER BY id")
        .expect("Failed to prepare prices");

    assert_eq!(names.step().unwrap(), Outcome::Row);
    assert_eq!(prices.step().unwrap(), Outcome::Row);
    assert_eq!(prices.step().unwrap(), Outcome::Row);
    assert_eq!(names.read_value(1).unwrap(), ColumnValue::Text("apple".into()));
    assert_eq!(prices.read_value(1).unwrap(), ColumnValue::Null);
    assert!(std::ptr::eq(names.connection(), &conn));
}
