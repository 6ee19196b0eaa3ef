use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{ExecArgs, QueryArgs, TableArgs};

/// Command-line front end for running SQL against an embedded SQLite database
///
/// Every subcommand opens one session on the selected database (an in-memory
/// database when no file is given), runs its SQL and prints the result as
/// markdown, or as JSON with `--json`.
#[derive(Parser)]
#[command(version, about, name = "quarry")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to a private in-memory
    /// database
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Open the database read-only
    #[arg(long, global = true)]
    pub read_only: bool,

    /// Wait up to this many milliseconds for locks held by other sessions
    #[arg(long, global = true, value_name = "MS")]
    pub busy_timeout_ms: Option<u64>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print results as JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the quarry CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Run SQL text directly, printing every row it produces
    #[command(alias = "x")]
    Exec(ExecArgs),
    /// Run SQL text and print its full result as a table
    #[command(alias = "t")]
    Table(TableArgs),
    /// Prepare one statement, bind parameters and read typed rows
    #[command(alias = "q")]
    Query(QueryArgs),
    /// Show the version of the linked SQLite library
    Version,
}
