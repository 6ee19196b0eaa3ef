//! Complete workflows over a [`Connection`], one per front-end command.
//!
//! Each handler takes a connection and a parameter struct from
//! [`crate::params`], and returns structured data that the caller formats
//! through [`crate::display`] or serializes as JSON.
//!
//! ```text
//! Interface → Handler → Connection / Statement → engine
//! ```

use std::ops::ControlFlow;

use log::warn;
use serde::Serialize;

use crate::{
    connection::Connection,
    error::{OutcomeExt, Result},
    marshal::ColumnValue,
    outcome::Outcome,
    params::{ExecuteSql, PreparedQuery, TableQuery},
    table::MaterializedTable,
};

/// Rows reported by the row callback of a direct execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecReport {
    pub rows: Vec<ExecRow>,
    /// Rows modified by the last data-changing statement
    pub changes: u64,
}

/// One callback invocation: parallel column names and text values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecRow {
    pub names: Vec<String>,
    pub values: Vec<Option<String>>,
}

/// Typed rows read from a single prepared statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ColumnValue>>,
    /// Outcome of the final step
    pub outcome: Outcome,
}

/// Handle direct execution of SQL text.
///
/// # Examples
///
/// ```rust
/// use quarry_core::{handlers::handle_execute, params::ExecuteSql, Connection};
///
/// # fn main() -> quarry_core::Result<()> {
/// let conn = Connection::open_in_memory()?;
/// let params = ExecuteSql { sql: "SELECT 1 AS one".to_string() };
/// let report = handle_execute(&conn, &params)?;
/// assert_eq!(report.rows[0].names, vec!["one"]);
/// # Ok(())
/// # }
/// ```
pub fn handle_execute(conn: &Connection, params: &ExecuteSql) -> Result<ExecReport> {
    let mut rows = Vec::new();
    conn.execute_with(&params.sql, |names, values| {
        rows.push(ExecRow {
            names: names.to_vec(),
            values: values.to_vec(),
        });
        ControlFlow::Continue(())
    })?;
    Ok(ExecReport {
        rows,
        changes: conn.changes()?,
    })
}

/// Handle materializing a table from SQL text.
pub fn handle_table(conn: &Connection, params: &TableQuery) -> Result<MaterializedTable> {
    conn.execute_to_table(&params.sql)
}

/// Handle a prepared query with optional parameters and column tags.
///
/// Only the first statement of the SQL text runs; any remainder is logged
/// and ignored. A failing bind or step is raised as an engine error.
pub fn handle_query(conn: &Connection, params: &PreparedQuery) -> Result<QueryResult> {
    let (mut stmt, tail) = conn.prepare(&params.sql)?;
    if !tail.trim().is_empty() {
        warn!("ignoring SQL after the first statement: {}", tail.trim());
    }

    if let Some(values) = &params.params {
        stmt.bind_json(values).or_engine_error(conn)?;
    }

    let columns = stmt.column_names()?;
    let mut rows = Vec::new();
    let outcome = loop {
        match stmt.step().or_engine_error(conn)? {
            Outcome::Row => rows.push(match &params.tags {
                Some(tags) => stmt.read_columns_tagged(tags)?,
                None => stmt.read_row()?,
            }),
            outcome => break outcome,
        }
    };
    stmt.finalize()?;

    Ok(QueryResult {
        columns,
        rows,
        outcome,
    })
}
