//! Symbolic outcomes for the engine's numeric result codes.
//!
//! Every native call funnels its status through [`translate`] exactly once, so
//! callers only ever see an [`Outcome`], never a raw integer.

use std::{fmt, str::FromStr};

use rusqlite::ffi;
use serde::{Deserialize, Serialize};

/// Closed vocabulary of engine results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Successful result
    Ok,
    /// SQL error or missing database
    Error,
    /// Internal logic error in the engine
    Internal,
    /// Access permission denied
    Perm,
    /// Callback routine requested an abort
    Abort,
    /// The database file is locked
    Busy,
    /// A table in the database is locked
    Locked,
    /// A malloc() failed
    NoMem,
    /// Attempt to write a readonly database
    ReadOnly,
    /// Operation terminated by an interrupt
    Interrupt,
    /// Some kind of disk I/O error occurred
    IoErr,
    /// The database disk image is malformed
    Corrupt,
    /// Unknown opcode or table/record not found
    NotFound,
    /// Insertion failed because database is full
    Full,
    /// Unable to open the database file
    CantOpen,
    /// Database lock protocol error
    Protocol,
    /// Database is empty
    Empty,
    /// The database schema changed
    Schema,
    /// String or BLOB exceeds size limit
    TooBig,
    /// Abort due to constraint violation
    Constraint,
    /// Data type mismatch
    Mismatch,
    /// Library used incorrectly
    Misuse,
    /// Uses OS features not supported on host
    NoLfs,
    /// Authorization denied
    Auth,
    /// Auxiliary database format error
    Format,
    /// Bind parameter index out of range
    Range,
    /// File opened that is not a database file
    NotADb,
    /// Notification from the logging interface
    Notice,
    /// Warning from the logging interface
    Warning,
    /// A step produced a row
    Row,
    /// A step finished executing
    Done,
    /// Any code outside the documented set
    Unknown,
}

/// Every documented outcome, in code order. `Unknown` is deliberately absent.
pub const KNOWN_OUTCOMES: [Outcome; 31] = [
    Outcome::Ok,
    Outcome::Error,
    Outcome::Internal,
    Outcome::Perm,
    Outcome::Abort,
    Outcome::Busy,
    Outcome::Locked,
    Outcome::NoMem,
    Outcome::ReadOnly,
    Outcome::Interrupt,
    Outcome::IoErr,
    Outcome::Corrupt,
    Outcome::NotFound,
    Outcome::Full,
    Outcome::CantOpen,
    Outcome::Protocol,
    Outcome::Empty,
    Outcome::Schema,
    Outcome::TooBig,
    Outcome::Constraint,
    Outcome::Mismatch,
    Outcome::Misuse,
    Outcome::NoLfs,
    Outcome::Auth,
    Outcome::Format,
    Outcome::Range,
    Outcome::NotADb,
    Outcome::Notice,
    Outcome::Warning,
    Outcome::Row,
    Outcome::Done,
];

/// Maps a native result code to its symbolic outcome.
///
/// Total: codes outside the documented enumeration map to
/// [`Outcome::Unknown`].
///
/// ```rust
/// use quarry_core::{translate, Outcome};
///
/// assert_eq!(translate(0), Outcome::Ok);
/// assert_eq!(translate(101), Outcome::Done);
/// assert_eq!(translate(-7), Outcome::Unknown);
/// ```
pub fn translate(code: i32) -> Outcome {
    match code {
        ffi::SQLITE_OK => Outcome::Ok,
        ffi::SQLITE_ERROR => Outcome::Error,
        ffi::SQLITE_INTERNAL => Outcome::Internal,
        ffi::SQLITE_PERM => Outcome::Perm,
        ffi::SQLITE_ABORT => Outcome::Abort,
        ffi::SQLITE_BUSY => Outcome::Busy,
        ffi::SQLITE_LOCKED => Outcome::Locked,
        ffi::SQLITE_NOMEM => Outcome::NoMem,
        ffi::SQLITE_READONLY => Outcome::ReadOnly,
        ffi::SQLITE_INTERRUPT => Outcome::Interrupt,
        ffi::SQLITE_IOERR => Outcome::IoErr,
        ffi::SQLITE_CORRUPT => Outcome::Corrupt,
        ffi::SQLITE_NOTFOUND => Outcome::NotFound,
        ffi::SQLITE_FULL => Outcome::Full,
        ffi::SQLITE_CANTOPEN => Outcome::CantOpen,
        ffi::SQLITE_PROTOCOL => Outcome::Protocol,
        ffi::SQLITE_EMPTY => Outcome::Empty,
        ffi::SQLITE_SCHEMA => Outcome::Schema,
        ffi::SQLITE_TOOBIG => Outcome::TooBig,
        ffi::SQLITE_CONSTRAINT => Outcome::Constraint,
        ffi::SQLITE_MISMATCH => Outcome::Mismatch,
        ffi::SQLITE_MISUSE => Outcome::Misuse,
        ffi::SQLITE_NOLFS => Outcome::NoLfs,
        ffi::SQLITE_AUTH => Outcome::Auth,
        ffi::SQLITE_FORMAT => Outcome::Format,
        ffi::SQLITE_RANGE => Outcome::Range,
        ffi::SQLITE_NOTADB => Outcome::NotADb,
        ffi::SQLITE_NOTICE => Outcome::Notice,
        ffi::SQLITE_WARNING => Outcome::Warning,
        ffi::SQLITE_ROW => Outcome::Row,
        ffi::SQLITE_DONE => Outcome::Done,
        _ => Outcome::Unknown,
    }
}

impl Outcome {
    /// Lowercase symbolic name, e.g. `"constraint"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::Error => "error",
            Outcome::Internal => "internal",
            Outcome::Perm => "perm",
            Outcome::Abort => "abort",
            Outcome::Busy => "busy",
            Outcome::Locked => "locked",
            Outcome::NoMem => "nomem",
            Outcome::ReadOnly => "readonly",
            Outcome::Interrupt => "interrupt",
            Outcome::IoErr => "ioerr",
            Outcome::Corrupt => "corrupt",
            Outcome::NotFound => "notfound",
            Outcome::Full => "full",
            Outcome::CantOpen => "cantopen",
            Outcome::Protocol => "protocol",
            Outcome::Empty => "empty",
            Outcome::Schema => "schema",
            Outcome::TooBig => "toobig",
            Outcome::Constraint => "constraint",
            Outcome::Mismatch => "mismatch",
            Outcome::Misuse => "misuse",
            Outcome::NoLfs => "nolfs",
            Outcome::Auth => "auth",
            Outcome::Format => "format",
            Outcome::Range => "range",
            Outcome::NotADb => "notadb",
            Outcome::Notice => "notice",
            Outcome::Warning => "warning",
            Outcome::Row => "row",
            Outcome::Done => "done",
            Outcome::Unknown => "unknown",
        }
    }

    /// The native code this outcome stands for, `None` for `Unknown`.
    pub fn code(&self) -> Option<i32> {
        let code = match self {
            Outcome::Ok => ffi::SQLITE_OK,
            Outcome::Error => ffi::SQLITE_ERROR,
            Outcome::Internal => ffi::SQLITE_INTERNAL,
            Outcome::Perm => ffi::SQLITE_PERM,
            Outcome::Abort => ffi::SQLITE_ABORT,
            Outcome::Busy => ffi::SQLITE_BUSY,
            Outcome::Locked => ffi::SQLITE_LOCKED,
            Outcome::NoMem => ffi::SQLITE_NOMEM,
            Outcome::ReadOnly => ffi::SQLITE_READONLY,
            Outcome::Interrupt => ffi::SQLITE_INTERRUPT,
            Outcome::IoErr => ffi::SQLITE_IOERR,
            Outcome::Corrupt => ffi::SQLITE_CORRUPT,
            Outcome::NotFound => ffi::SQLITE_NOTFOUND,
            Outcome::Full => ffi::SQLITE_FULL,
            Outcome::CantOpen => ffi::SQLITE_CANTOPEN,
            Outcome::Protocol => ffi::SQLITE_PROTOCOL,
            Outcome::Empty => ffi::SQLITE_EMPTY,
            Outcome::Schema => ffi::SQLITE_SCHEMA,
            Outcome::TooBig => ffi::SQLITE_TOOBIG,
            Outcome::Constraint => ffi::SQLITE_CONSTRAINT,
            Outcome::Mismatch => ffi::SQLITE_MISMATCH,
            Outcome::Misuse => ffi::SQLITE_MISUSE,
            Outcome::NoLfs => ffi::SQLITE_NOLFS,
            Outcome::Auth => ffi::SQLITE_AUTH,
            Outcome::Format => ffi::SQLITE_FORMAT,
            Outcome::Range => ffi::SQLITE_RANGE,
            Outcome::NotADb => ffi::SQLITE_NOTADB,
            Outcome::Notice => ffi::SQLITE_NOTICE,
            Outcome::Warning => ffi::SQLITE_WARNING,
            Outcome::Row => ffi::SQLITE_ROW,
            Outcome::Done => ffi::SQLITE_DONE,
            Outcome::Unknown => return None,
        };
        Some(code)
    }

    /// True for `ok`, `row` and `done`.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Ok | Outcome::Row | Outcome::Done)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        KNOWN_OUTCOMES
            .iter()
            .copied()
            .chain(std::iter::once(Outcome::Unknown))
            .find(|outcome| outcome.as_str() == lowered)
            .ok_or_else(|| format!("Invalid outcome: {s}"))
    }
}

/// Dynamic type of a single column value in the current row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    Blob,
    Null,
    /// The engine reported a type code outside the fundamental five
    Error,
}

impl ColumnType {
    /// Maps the engine's fundamental datatype code.
    pub fn from_code(code: i32) -> Self {
        match code {
            ffi::SQLITE_INTEGER => ColumnType::Integer,
            ffi::SQLITE_FLOAT => ColumnType::Float,
            ffi::SQLITE_TEXT => ColumnType::Text,
            ffi::SQLITE_BLOB => ColumnType::Blob,
            ffi::SQLITE_NULL => ColumnType::Null,
            _ => ColumnType::Error,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Blob => "blob",
            ColumnType::Null => "null",
            ColumnType::Error => "error",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_known_codes_translate_to_distinct_outcomes() {
        let codes: Vec<i32> = (0..=28).chain([100, 101]).collect();
        let outcomes: HashSet<Outcome> = codes.iter().map(|&c| translate(c)).collect();

        assert_eq!(outcomes.len(), codes.len());
        assert!(!outcomes.contains(&Outcome::Unknown));
    }

    #[test]
    fn test_unrecognized_codes_are_unknown() {
        for code in [-1, 29, 99, 102, 266, i32::MAX, i32::MIN] {
            assert_eq!(translate(code), Outcome::Unknown, "code {code}");
        }
    }

    #[test]
    fn test_code_inverts_translate() {
        for outcome in KNOWN_OUTCOMES {
            let code = outcome.code().expect("known outcome has a code");
            assert_eq!(translate(code), outcome);
        }
        assert_eq!(Outcome::Unknown.code(), None);
    }

    #[test]
    fn test_names_match_engine_vocabulary() {
        assert_eq!(translate(19).as_str(), "constraint");
        assert_eq!(translate(26).as_str(), "notadb");
        assert_eq!(translate(10).to_string(), "ioerr");
        assert_eq!("BUSY".parse::<Outcome>(), Ok(Outcome::Busy));
        assert!("nonsense".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_serializes_as_lowercase_name() {
        let json = serde_json::to_string(&Outcome::CantOpen).unwrap();
        assert_eq!(json, "\"cantopen\"");
    }

    #[test]
    fn test_success_outcomes() {
        assert!(Outcome::Ok.is_success());
        assert!(Outcome::Row.is_success());
        assert!(Outcome::Done.is_success());
        assert!(!Outcome::Misuse.is_success());
        assert!(!Outcome::Unknown.is_success());
    }

    #[test]
    fn test_column_type_from_code() {
        assert_eq!(ColumnType::from_code(1), ColumnType::Integer);
        assert_eq!(ColumnType::from_code(5), ColumnType::Null);
        assert_eq!(ColumnType::from_code(42), ColumnType::Error);
        assert_eq!(ColumnType::Float.to_string(), "float");
    }
}
