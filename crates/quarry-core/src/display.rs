//! Markdown rendering of results.
//!
//! Tables and query results format as markdown tables so a terminal
//! front end can hand the text straight to a markdown renderer. Values
//! format the way the engine's text conversion would show them, except that
//! NULL prints as `NULL` and blobs print as `x'…'` hex literals.

use std::fmt;

use crate::{
    handlers::{ExecReport, QueryResult},
    marshal::ColumnValue,
    table::MaterializedTable,
};

const NULL_CELL: &str = "NULL";

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => f.write_str(NULL_CELL),
            ColumnValue::Integer(value) => write!(f, "{value}"),
            ColumnValue::Float(value) => write!(f, "{value}"),
            ColumnValue::Text(value) => f.write_str(value),
            ColumnValue::Blob(bytes) => {
                f.write_str("x'")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("'")
            }
        }
    }
}

/// Pipes would split a markdown cell, and newlines would end the row.
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

fn write_markdown_table<R, C>(
    f: &mut fmt::Formatter<'_>,
    header: &[String],
    rows: R,
) -> fmt::Result
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = String>,
{
    if header.is_empty() {
        return writeln!(f, "_No result columns._");
    }

    f.write_str("|")?;
    for name in header {
        write!(f, " {} |", escape_cell(name))?;
    }
    writeln!(f)?;
    writeln!(f, "|{}", "---|".repeat(header.len()))?;

    let mut count = 0;
    for row in rows {
        f.write_str("|")?;
        for cell in row {
            write!(f, " {} |", escape_cell(&cell))?;
        }
        writeln!(f)?;
        count += 1;
    }

    writeln!(f)?;
    match count {
        1 => writeln!(f, "_1 row_"),
        n => writeln!(f, "_{n} rows_"),
    }
}

impl fmt::Display for MaterializedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_markdown_table(
            f,
            self.columns(),
            self.rows().iter().map(|row| {
                row.iter()
                    .map(|cell| cell.clone().unwrap_or_else(|| NULL_CELL.to_string()))
            }),
        )
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_markdown_table(
            f,
            &self.columns,
            self.rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string)),
        )
    }
}

impl fmt::Display for ExecReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            writeln!(f, "**Row {}**", index + 1)?;
            writeln!(f)?;
            for (name, value) in row.names.iter().zip(&row.values) {
                writeln!(f, "- {name}: {}", value.as_deref().unwrap_or(NULL_CELL))?;
            }
            writeln!(f)?;
        }
        write!(f, "OK, {} row(s) changed", self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handlers::ExecRow, Connection, Outcome};

    #[test]
    fn test_column_value_display() {
        assert_eq!(ColumnValue::Null.to_string(), "NULL");
        assert_eq!(ColumnValue::Integer(-4).to_string(), "-4");
        assert_eq!(ColumnValue::Float(1.5).to_string(), "1.5");
        assert_eq!(ColumnValue::Blob(vec![0x0a, 0xff]).to_string(), "x'0aff'");
    }

    #[test]
    fn test_table_renders_markdown() {
        let conn = Connection::open_in_memory().unwrap();
        let table = conn
            .execute_to_table("SELECT 1 AS a, NULL AS b, 'p|q' AS c")
            .unwrap();

        let output = table.to_string();
        assert!(output.contains("| a | b | c |"));
        assert!(output.contains("|---|---|---|"));
        assert!(output.contains("| 1 | NULL | p\\|q |"));
        assert!(output.contains("_1 row_"));
    }

    #[test]
    fn test_empty_header_message() {
        let output = MaterializedTable::default().to_string();
        assert!(output.contains("No result columns"));
    }

    #[test]
    fn test_query_result_and_exec_report() {
        let result = QueryResult {
            columns: vec!["n".to_string()],
            rows: vec![vec![ColumnValue::Integer(1)], vec![ColumnValue::Null]],
            outcome: Outcome::Done,
        };
        assert!(result.to_string().contains("| NULL |"));
        assert!(result.to_string().contains("_2 rows_"));

        let report = ExecReport {
            rows: vec![ExecRow {
                names: vec!["x".to_string()],
                values: vec![None],
            }],
            changes: 0,
        };
        let output = report.to_string();
        assert!(output.contains("**Row 1**"));
        assert!(output.contains("- x: NULL"));
        assert!(output.ends_with("OK, 0 row(s) changed"));
    }
}
