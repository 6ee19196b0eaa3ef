#![allow(dead_code)]

use quarry_core::{Connection, ConnectionBuilder};
use tempfile::TempDir;

/// Helper function to open an on-disk database in a fresh directory
pub fn create_test_db() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let conn = ConnectionBuilder::new()
        .with_database_path(Some(&db_path))
        .open()
        .expect("Failed to open test database");
    (temp_dir, conn)
}

/// Helper function to open an in-memory database with a small seeded table
pub fn create_seeded_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
    conn.execute(
        "CREATE TABLE items(id INTEGER PRIMARY KEY, name TEXT, price REAL, data BLOB);
         INSERT INTO items(name, price, data) VALUES ('apple', 1.25, x'01');
         INSERT INTO items(name, price, data) VALUES ('pear', NULL, NULL);",
    )
    .expect("Failed to seed database");
    conn
}
