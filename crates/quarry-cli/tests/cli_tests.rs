use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a Command with --no-color flag for testing
fn quarry_cmd() -> Command {
    let mut cmd = Command::cargo_bin("quarry").expect("Failed to find quarry binary");
    cmd.arg("--no-color");
    cmd
}

#[test]
fn test_cli_table_in_memory() {
    quarry_cmd()
        .args(["table", "SELECT 1 AS a, 'x' AS b"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| a | b |"))
        .stdout(predicate::str::contains("| 1 | x |"))
        .stdout(predicate::str::contains("_1 row_"));
}

#[test]
fn test_cli_table_json() {
    quarry_cmd()
        .args(["--json", "table", "SELECT NULL AS n"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"columns\""))
        .stdout(predicate::str::contains("null"));
}

#[test]
fn test_cli_exec_then_table_on_file() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db = db_path.to_str().unwrap();

    quarry_cmd()
        .args([
            "--database-file",
            db,
            "exec",
            "CREATE TABLE t(a, b); INSERT INTO t VALUES (1, 'one'), (2, 'two');",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 row(s) changed"));

    quarry_cmd()
        .args(["--database-file", db, "table", "SELECT b FROM t ORDER BY a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| one |"))
        .stdout(predicate::str::contains("| two |"));
}

#[test]
fn test_cli_exec_prints_rows() {
    quarry_cmd()
        .args(["exec", "SELECT 'hello' AS greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Row 1**"))
        .stdout(predicate::str::contains("- greeting: hello"));
}

#[test]
fn test_cli_query_with_named_params() {
    quarry_cmd()
        .args([
            "query",
            "SELECT :name AS name, :count AS count",
            "--params",
            r#"{"name": "foo", "count": 3}"#,
            "--tags",
            "ti",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("| foo | 3 |"));
}

#[test]
fn test_cli_query_json_output() {
    quarry_cmd()
        .args(["--json", "query", "SELECT ?, ?", "--params", "[10, 20]", "--tags", "ii"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"outcome\": \"done\""))
        .stdout(predicate::str::contains("10"))
        .stdout(predicate::str::contains("20"));
}

#[test]
fn test_cli_query_unknown_parameter() {
    quarry_cmd()
        .args(["query", "SELECT :a", "--params", r#"{"b": 1}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid statement parameter ':b'"));
}

#[test]
fn test_cli_query_tag_mismatch() {
    quarry_cmd()
        .args(["query", "SELECT 1, 2", "--tags", "i"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid column count 1"));
}

#[test]
fn test_cli_invalid_json_params() {
    quarry_cmd()
        .args(["query", "SELECT ?", "--params", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn test_cli_sql_error() {
    quarry_cmd()
        .args(["table", "SELECT * FROM missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no such table: missing"));
}

#[test]
fn test_cli_read_only_rejects_writes() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("ro.db");
    let db = db_path.to_str().unwrap();

    quarry_cmd()
        .args(["--database-file", db, "exec", "CREATE TABLE t(a)"])
        .assert()
        .success();

    quarry_cmd()
        .args([
            "--database-file",
            db,
            "--read-only",
            "--busy-timeout-ms",
            "100",
            "exec",
            "INSERT INTO t VALUES (1)",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("readonly"));
}

#[test]
fn test_cli_version() {
    quarry_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("SQLite"))
        .stdout(predicate::str::contains("Threading mode"));
}
