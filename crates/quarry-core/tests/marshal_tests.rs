mod common;

use std::collections::BTreeMap;

use common::create_seeded_db;
use quarry_core::{BindValue, ColumnValue, Connection, Outcome, QuarryError};
use serde_json::json;

#[test]
fn test_associative_bind_then_tagged_read() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let (mut stmt, _) = conn
        .prepare("SELECT :name, :count")
        .expect("Failed to prepare");

    let params = json!({"name": "foo", "count": 3});
    assert_eq!(stmt.bind_json(&params).expect("Failed to bind"), Outcome::Ok);
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Row);

    let row = stmt.read_columns_tagged("ti").expect("Failed to read");
    assert_eq!(
        row,
        vec![ColumnValue::Text("foo".into()), ColumnValue::Integer(3)]
    );
}

#[test]
fn test_sequence_bind_then_tagged_read() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let (mut stmt, _) = conn.prepare("SELECT ?, ?").expect("Failed to prepare");

    assert_eq!(
        stmt.bind_from_sequence([10i64, 20]).expect("Failed to bind"),
        Outcome::Ok
    );
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Row);
    assert_eq!(
        stmt.read_columns_tagged("ii").expect("Failed to read"),
        vec![ColumnValue::Integer(10), ColumnValue::Integer(20)]
    );
}

#[test]
fn test_unknown_parameter_names_the_key() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let (mut stmt, _) = conn.prepare("SELECT :a, :b").expect("Failed to prepare");

    let mut params = BTreeMap::new();
    params.insert("a", 1i64);
    params.insert("zzz", 2i64);

    let err = stmt
        .bind_from_associative(&params)
        .expect_err("Unknown key should fail");
    assert!(matches!(&err, QuarryError::UnknownParameter { name } if name == ":zzz"));
    assert!(err.to_string().contains(":zzz"));

    // Keys before the failing one stay bound.
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Row);
    assert_eq!(
        stmt.read_row().expect("Failed to read"),
        vec![ColumnValue::Integer(1), ColumnValue::Null]
    );
}

#[test]
fn test_unknown_scalar_name() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let (mut stmt, _) = conn.prepare("SELECT :a").expect("Failed to prepare");

    assert!(matches!(
        stmt.bind(":b", 1i64),
        Err(QuarryError::UnknownParameter { name }) if name == ":b"
    ));
}

#[test]
fn test_tag_count_mismatch() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let (mut stmt, _) = conn.prepare("SELECT 1, 2").expect("Failed to prepare");
    stmt.step().expect("Failed to step");

    for tags in ["i", "iii"] {
        let err = stmt.read_columns_tagged(tags).expect_err("Mismatch should fail");
        assert!(matches!(
            err,
            QuarryError::ColumnCountMismatch { columns: 2, .. }
        ));
    }
    assert!(matches!(
        stmt.read_columns_tagged("iz"),
        Err(QuarryError::InvalidColumnTag { tag: 'z' })
    ));
}

#[test]
fn test_tagged_read_returns_bound_values() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let (mut stmt, _) = conn.prepare("SELECT ?, ?, ?, ?").expect("Failed to prepare");

    let values = [
        BindValue::Null,
        BindValue::Integer(-7),
        BindValue::Number(2.5),
        BindValue::Text("héllo".into()),
    ];
    assert_eq!(stmt.bind_from_sequence(&values).expect("Failed to bind"), Outcome::Ok);
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Row);

    let row = stmt.read_columns_tagged("iift").expect("Failed to read");
    assert_eq!(
        row,
        vec![
            ColumnValue::Null,
            ColumnValue::Integer(-7),
            ColumnValue::Float(2.5),
            ColumnValue::Text("héllo".into()),
        ]
    );
    assert_ne!(row[0], ColumnValue::Integer(0));
    assert_ne!(row[0], ColumnValue::Text(String::new()));
}

#[test]
fn test_value_roundtrip_through_table() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    conn.execute("CREATE TABLE v(n, i, f, t, b)")
        .expect("Failed to create table");

    let (mut insert, _) = conn
        .prepare("INSERT INTO v VALUES (?, ?, ?, ?, ?)")
        .expect("Failed to prepare insert");
    let values = [
        BindValue::Null,
        BindValue::Integer(-7),
        BindValue::Number(2.5),
        BindValue::Text("héllo".into()),
        BindValue::Blob(vec![0xde, 0xad]),
    ];
    assert_eq!(insert.bind_from_sequence(&values).expect("Failed to bind"), Outcome::Ok);
    assert_eq!(insert.step().expect("Failed to insert"), Outcome::Done);
    insert.finalize().expect("Failed to finalize");

    let (mut select, _) = conn
        .prepare("SELECT n, i, f, t, b FROM v")
        .expect("Failed to prepare select");
    assert_eq!(select.step().expect("Failed to step"), Outcome::Row);
    assert_eq!(
        select.read_columns_tagged("iftbb").expect("Failed to read"),
        vec![
            ColumnValue::Null,
            ColumnValue::Float(-7.0),
            ColumnValue::Text("2.5".into()),
            ColumnValue::Blob("héllo".as_bytes().to_vec()),
            ColumnValue::Blob(vec![0xde, 0xad]),
        ]
    );

    // Conversions above may change a cell's cached type; read afresh.
    select.reset().expect("Failed to reset");
    assert_eq!(select.step().expect("Failed to step"), Outcome::Row);
    assert_eq!(
        select.read_row().expect("Failed to read"),
        vec![
            ColumnValue::Null,
            ColumnValue::Integer(-7),
            ColumnValue::Float(2.5),
            ColumnValue::Text("héllo".into()),
            ColumnValue::Blob(vec![0xde, 0xad]),
        ]
    );
}

#[test]
fn test_bound_buffers_are_copied() {
    let conn = Connection::open_in_memory().expect("Failed to open database");
    let (mut stmt, _) = conn.prepare("SELECT ?").expect("Failed to prepare");

    {
        let text = String::from("transient");
        stmt.bind(1usize, text.as_str()).expect("Failed to bind");
    }
    assert_eq!(stmt.step().expect("Failed to step"), Outcome::Row);
    assert_eq!(
        stmt.read_text(1).expect("Failed to read").as_deref(),
        Some("transient")
    );
}

#[test]
fn test_json_array_and_nested_values() {
    let conn = create_seeded_db();
    let (mut stmt, _) = conn
        .prepare("SELECT name FROM items WHERE id = ?1 OR name = ?2 ORDER BY id")
        .expect("Failed to prepare");

    stmt.bind_json(&json!([1, "pear"])).expect("Failed to bind");
    let mut names = Vec::new();
    while stmt.step().expect("Failed to step") == Outcome::Row {
        names.push(stmt.read_text(1).expect("Failed to read"));
    }
    assert_eq!(names, vec![Some("apple".to_string()), Some("pear".to_string())]);

    stmt.reset().expect("Failed to reset");
    assert!(matches!(
        stmt.bind_json(&json!([[1], "x"])),
        Err(QuarryError::UnbindableType { type_name: "array" })
    ));
}
