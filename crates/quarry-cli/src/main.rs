//! Quarry CLI Application
//!
//! Command-line front end over quarry-core: open a database, run SQL, print
//! the result.

mod args;
mod cli;
mod renderer;

use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use quarry_core::ConnectionBuilder;
use renderer::TerminalRenderer;
use Commands::*;

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        read_only,
        busy_timeout_ms,
        no_color,
        json,
        command,
    } = Args::parse();

    let conn = ConnectionBuilder::new()
        .with_database_path(database_file)
        .read_only(read_only)
        .with_busy_timeout(busy_timeout_ms.map(Duration::from_millis))
        .open()
        .context("Failed to open database")?;

    info!("quarry started on '{}'", conn.path());

    let cli = Cli::new(conn, TerminalRenderer::new(!no_color), json);
    match command {
        Exec(args) => cli.exec(args),
        Table(args) => cli.table(args),
        Query(args) => cli.query(args),
        Version => cli.version(),
    }
}
