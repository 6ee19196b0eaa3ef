//! Command handlers and their clap argument wrappers.
//!
//! Argument structs carry the clap derives and convert into the core's
//! framework-free parameter types:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → quarry_core::handlers
//! ```

use anyhow::{Context, Result};
use clap::Args;
use quarry_core::{
    handlers::{handle_execute, handle_query, handle_table},
    params::{ExecuteSql, PreparedQuery, TableQuery},
    threading_mode, version, version_number, Connection,
};
use serde::Serialize;

use crate::renderer::TerminalRenderer;

/// Run SQL text directly
#[derive(Args)]
pub struct ExecArgs {
    /// SQL text; may hold several statements separated by `;`
    pub sql: String,
}

impl From<ExecArgs> for ExecuteSql {
    fn from(val: ExecArgs) -> Self {
        ExecuteSql { sql: val.sql }
    }
}

/// Materialize a query result as a table
#[derive(Args)]
pub struct TableArgs {
    /// SQL text; every statement with result columns must have the same
    /// number of columns
    pub sql: String,
}

impl From<TableArgs> for TableQuery {
    fn from(val: TableArgs) -> Self {
        TableQuery { sql: val.sql }
    }
}

/// Prepare and step one statement
#[derive(Args)]
pub struct QueryArgs {
    /// SQL text of a single statement
    pub sql: String,
    /// Parameters as JSON: an object binds `:name` parameters, an array
    /// binds positions 1, 2, ...
    #[arg(long, value_name = "JSON", value_parser = parse_json)]
    pub params: Option<serde_json::Value>,
    /// Column tags, one per result column: i (integer), f (float), t (text),
    /// b (blob)
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,
}

impl From<QueryArgs> for PreparedQuery {
    fn from(val: QueryArgs) -> Self {
        PreparedQuery {
            sql: val.sql,
            params: val.params,
            tags: val.tags,
        }
    }
}

fn parse_json(raw: &str) -> std::result::Result<serde_json::Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}

#[derive(Serialize)]
struct VersionInfo {
    version: &'static str,
    version_number: i32,
    threading_mode: quarry_core::ThreadingMode,
}

/// Runs commands against one open connection.
pub struct Cli {
    conn: Connection,
    renderer: TerminalRenderer,
    json: bool,
}

impl Cli {
    pub fn new(conn: Connection, renderer: TerminalRenderer, json: bool) -> Self {
        Self {
            conn,
            renderer,
            json,
        }
    }

    pub fn exec(&self, args: ExecArgs) -> Result<()> {
        let report =
            handle_execute(&self.conn, &args.into()).context("Failed to execute SQL")?;
        self.output(&report, &report.to_string())
    }

    pub fn table(&self, args: TableArgs) -> Result<()> {
        let table = handle_table(&self.conn, &args.into()).context("Failed to build table")?;
        self.output(&table, &table.to_string())
    }

    pub fn query(&self, args: QueryArgs) -> Result<()> {
        let result = handle_query(&self.conn, &args.into()).context("Failed to run query")?;
        self.output(&result, &result.to_string())
    }

    pub fn version(&self) -> Result<()> {
        let info = VersionInfo {
            version: version(),
            version_number: version_number(),
            threading_mode: threading_mode(),
        };
        let markdown = format!(
            "**SQLite** {} ({})\n\nThreading mode: {}\n",
            info.version, info.version_number, info.threading_mode
        );
        self.output(&info, &markdown)
    }

    fn output<T: Serialize>(&self, value: &T, markdown: &str) -> Result<()> {
        if self.json {
            let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
            println!("{json}");
            Ok(())
        } else {
            self.renderer.render(markdown)
        }
    }
}
