//! Materializing a query's full result as a table of text cells.

use rusqlite::ffi as sys;
use serde::Serialize;

use crate::{
    connection::Connection,
    error::{QuarryError, Result},
    outcome::{ColumnType, Outcome},
    statement::Statement,
};

/// Header plus rows of text cells; SQL NULL stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializedTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl MaterializedTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at 0-based `row` and `column`; `None` both for NULL and out of
    /// range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }
}

impl Connection {
    /// Runs every statement in `sql` and collects all result rows.
    ///
    /// The header comes from the first statement that produces a row; every
    /// later row must have the same column count. When no statement produces
    /// a row, the first statement with result columns still supplies the
    /// header. SQL text containing a NUL byte is rejected with
    /// [`QuarryError::InvalidInput`].
    ///
    /// ```rust
    /// use quarry_core::Connection;
    ///
    /// # fn main() -> quarry_core::Result<()> {
    /// let conn = Connection::open_in_memory()?;
    /// let table = conn.execute_to_table("CREATE TABLE t(a, b); SELECT * FROM t")?;
    /// assert_eq!(table.columns(), ["a", "b"]);
    /// assert_eq!(table.row_count(), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn execute_to_table(&self, sql: &str) -> Result<MaterializedTable> {
        let mut table = MaterializedTable::default();
        let mut header_fixed = false;
        let mut rest = sql;

        while !rest.trim().is_empty() {
            let (stmt, tail) = self.prepare_next(rest)?;
            if tail.len() == rest.len() {
                break;
            }
            rest = tail;
            let Some(mut stmt) = stmt else {
                continue;
            };

            let columns = stmt.column_count()?;
            if columns > 0 && table.columns.is_empty() {
                table.columns = stmt.column_names()?;
            }

            loop {
                match stmt.step()? {
                    Outcome::Row => {
                        if !header_fixed {
                            table.columns = stmt.column_names()?;
                            header_fixed = true;
                        } else if columns != table.columns.len() {
                            return Err(QuarryError::engine(sys::SQLITE_ERROR)
                                .with_message("two or more incompatible queries"));
                        }
                        table.rows.push(read_text_row(&stmt, columns)?);
                    }
                    Outcome::Done => break,
                    outcome => {
                        let code = outcome.code().unwrap_or_else(|| self.last_error_code());
                        return Err(self.engine_error(code));
                    }
                }
            }
        }
        Ok(table)
    }
}

fn read_text_row(stmt: &Statement<'_>, columns: usize) -> Result<Vec<Option<String>>> {
    (1..=columns)
        .map(|index| match stmt.column_type(index)? {
            ColumnType::Null => Ok(None),
            _ => stmt.read_text(index),
        })
        .collect()
}
