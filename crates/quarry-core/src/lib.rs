//! Statement lifecycle and value marshalling over embedded SQLite.
//!
//! This crate wraps the engine's native API in owned handles with a checked
//! lifecycle, and converts between Rust (or dynamic JSON) values and the
//! engine's typed cells.
//!
//! # Layers
//!
//! - **Outcomes** ([`outcome`]): every native result code becomes a symbolic
//!   [`Outcome`].
//! - **Handles** ([`connection`], [`statement`]): a [`Connection`] owns a
//!   session; each [`Statement`] borrows the connection that prepared it and
//!   tracks its execution state.
//! - **Marshalling** ([`marshal`]): scalar and bulk parameter binding, tagged
//!   and dynamic column reads.
//! - **Materializing** ([`table`]): a whole query result as text cells.
//! - **Front-end support** ([`params`], [`handlers`], [`display`]): complete
//!   workflows and their markdown formatting, as used by the `quarry` CLI.
//!
//! # Quick Start
//!
//! ```rust
//! use quarry_core::{ColumnValue, Connection, Outcome};
//!
//! # fn main() -> quarry_core::Result<()> {
//! let conn = Connection::open_in_memory()?;
//! conn.execute("CREATE TABLE t(a, b); INSERT INTO t VALUES (1, 'x')")?;
//!
//! let table = conn.execute_to_table("SELECT a, b FROM t")?;
//! assert_eq!(table.columns(), ["a", "b"]);
//! assert_eq!(table.rows()[0], vec![Some("1".to_string()), Some("x".to_string())]);
//!
//! let (mut stmt, _) = conn.prepare("SELECT b FROM t WHERE a = :a")?;
//! stmt.bind_from_associative([("a", 1i64)])?;
//! assert_eq!(stmt.step()?, Outcome::Row);
//! assert_eq!(stmt.read_columns_tagged("t")?, vec![ColumnValue::Text("x".into())]);
//! stmt.finalize()?;
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod display;
pub mod error;
mod ffi;
pub mod handlers;
pub mod library;
pub mod marshal;
pub mod outcome;
pub mod params;
pub mod statement;
pub mod table;

// Re-export commonly used types
pub use connection::{Connection, ConnectionBuilder, MEMORY_PATH};
pub use error::{OutcomeExt, QuarryError, Result};
pub use library::{threading_mode, version, version_number, ThreadingMode};
pub use marshal::{BindValue, ColumnTag, ColumnValue, ParamKey, ToBindValue};
pub use outcome::{translate, ColumnType, Outcome, KNOWN_OUTCOMES};
pub use statement::{Statement, StatementState};
pub use table::MaterializedTable;
