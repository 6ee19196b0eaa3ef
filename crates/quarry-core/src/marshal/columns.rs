//! Reading typed values out of the current row.
//!
//! Bulk reads are driven by a tag string with one character per result
//! column:
//!
//! - `i`: 64-bit integer
//! - `f`: double
//! - `t`: text
//! - `b`: blob
//!
//! A column that holds SQL NULL is returned as [`ColumnValue::Null`] whatever
//! its tag says.

use std::{fmt, os::raw::c_int};

use super::ColumnValue;
use crate::{
    error::{QuarryError, Result},
    ffi::RawStmt,
    outcome::ColumnType,
    statement::Statement,
};

/// Requested conversion for one column of a tagged read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTag {
    Int,
    Float,
    Text,
    Blob,
}

impl ColumnTag {
    pub fn as_char(&self) -> char {
        match self {
            ColumnTag::Int => 'i',
            ColumnTag::Float => 'f',
            ColumnTag::Text => 't',
            ColumnTag::Blob => 'b',
        }
    }

    /// Parses every character of a tag string.
    pub fn parse_all(tags: &str) -> Result<Vec<ColumnTag>> {
        tags.chars().map(ColumnTag::try_from).collect()
    }
}

impl TryFrom<char> for ColumnTag {
    type Error = QuarryError;

    fn try_from(tag: char) -> Result<Self> {
        match tag {
            'i' => Ok(ColumnTag::Int),
            'f' => Ok(ColumnTag::Float),
            't' => Ok(ColumnTag::Text),
            'b' => Ok(ColumnTag::Blob),
            _ => Err(QuarryError::InvalidColumnTag { tag }),
        }
    }
}

impl fmt::Display for ColumnTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Statement<'_> {
    /// Reads every column of the current row, converting each per its tag.
    ///
    /// The tag count is checked against the column count before anything
    /// else, so a mismatched tag string fails with
    /// [`QuarryError::ColumnCountMismatch`] even when no row is available.
    ///
    /// ```rust
    /// use quarry_core::{ColumnValue, Connection};
    ///
    /// # fn main() -> quarry_core::Result<()> {
    /// let conn = Connection::open_in_memory()?;
    /// let (mut stmt, _) = conn.prepare("SELECT 'foo', 3, NULL")?;
    /// stmt.step()?;
    /// let row = stmt.read_columns_tagged("tii")?;
    /// assert_eq!(
    ///     row,
    ///     vec![
    ///         ColumnValue::Text("foo".into()),
    ///         ColumnValue::Integer(3),
    ///         ColumnValue::Null,
    ///     ]
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn read_columns_tagged(&self, tags: &str) -> Result<Vec<ColumnValue>> {
        let columns = self.column_count()?;
        let tag_count = tags.chars().count();
        if tag_count != columns {
            return Err(QuarryError::ColumnCountMismatch {
                tags: tag_count,
                columns,
            });
        }
        let tags = ColumnTag::parse_all(tags)?;
        let raw = self.row_raw("read columns of")?;

        let mut column: c_int = 0;
        let mut row = Vec::with_capacity(tags.len());
        for tag in tags {
            row.push(read_tagged(raw, column, tag));
            column += 1;
        }
        Ok(row)
    }

    /// Reads the whole current row using each column's own dynamic type.
    pub fn read_row(&self) -> Result<Vec<ColumnValue>> {
        (1..=self.column_count()?)
            .map(|index| self.read_value(index))
            .collect()
    }

    /// Reads one column using its dynamic type.
    pub fn read_value(&self, index: usize) -> Result<ColumnValue> {
        let column = self.column_offset(index)?;
        let raw = self.row_raw("read a column of")?;
        let value = match ColumnType::from_code(raw.column_type(column)) {
            ColumnType::Integer => ColumnValue::Integer(raw.column_int64(column)),
            ColumnType::Float => ColumnValue::Float(raw.column_double(column)),
            ColumnType::Text => read_tagged(raw, column, ColumnTag::Text),
            ColumnType::Blob => ColumnValue::Blob(raw.column_blob(column)),
            ColumnType::Null | ColumnType::Error => ColumnValue::Null,
        };
        Ok(value)
    }

    /// Integer value of a column; SQL NULL reads as `0`.
    pub fn read_int(&self, index: usize) -> Result<i64> {
        let column = self.column_offset(index)?;
        Ok(self.row_raw("read a column of")?.column_int64(column))
    }

    /// Double value of a column; SQL NULL reads as `0.0`.
    pub fn read_float(&self, index: usize) -> Result<f64> {
        let column = self.column_offset(index)?;
        Ok(self.row_raw("read a column of")?.column_double(column))
    }

    /// Text value of a column; `None` for SQL NULL.
    pub fn read_text(&self, index: usize) -> Result<Option<String>> {
        let column = self.column_offset(index)?;
        let raw = self.row_raw("read a column of")?;
        Ok(raw.column_text(column).map(decode_text))
    }

    /// Blob value of a column; `None` for SQL NULL.
    pub fn read_blob(&self, index: usize) -> Result<Option<Vec<u8>>> {
        let column = self.column_offset(index)?;
        let raw = self.row_raw("read a column of")?;
        if ColumnType::from_code(raw.column_type(column)) == ColumnType::Null {
            return Ok(None);
        }
        Ok(Some(raw.column_blob(column)))
    }

    /// Dynamic type of a column in the current row.
    pub fn column_type(&self, index: usize) -> Result<ColumnType> {
        let column = self.column_offset(index)?;
        let raw = self.row_raw("inspect a column of")?;
        Ok(ColumnType::from_code(raw.column_type(column)))
    }
}

fn read_tagged(raw: &RawStmt, column: c_int, tag: ColumnTag) -> ColumnValue {
    // The type must be checked before any conversion call changes it.
    if ColumnType::from_code(raw.column_type(column)) == ColumnType::Null {
        return ColumnValue::Null;
    }
    match tag {
        ColumnTag::Int => ColumnValue::Integer(raw.column_int64(column)),
        ColumnTag::Float => ColumnValue::Float(raw.column_double(column)),
        ColumnTag::Text => raw
            .column_text(column)
            .map_or(ColumnValue::Null, |bytes| ColumnValue::Text(decode_text(bytes))),
        ColumnTag::Blob => ColumnValue::Blob(raw.column_blob(column)),
    }
}

fn decode_text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
