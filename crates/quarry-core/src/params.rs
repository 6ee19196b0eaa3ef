//! Parameter structures shared by front ends.
//!
//! These carry no framework derives. A front end such as the `quarry` CLI
//! defines its own argument structs (with clap attributes) and converts them
//! into these via `From`, keeping the core free of interface concerns.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌──────────────────┐
//! │   CLI Args      │    │  Core Params    │    │    Handlers      │
//! │  (clap derives) │───▶│ (minimal deps)  │───▶│ (crate::handlers)│
//! └─────────────────┘    └─────────────────┘    └──────────────────┘
//! ```

use serde_json::Value;

/// Run SQL text directly, reporting every row.
#[derive(Debug, Clone)]
pub struct ExecuteSql {
    pub sql: String,
}

/// Materialize the full result of SQL text as a table.
#[derive(Debug, Clone)]
pub struct TableQuery {
    pub sql: String,
}

/// Prepare one statement, bind parameters, step it to completion.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub sql: String,
    /// JSON object (bound by name) or array (bound by position)
    pub params: Option<Value>,
    /// Column tag string; rows are read by dynamic type when absent
    pub tags: Option<String>,
}
