//! Error types for the binding layer.
//!
//! Engine status codes travel as [`Outcome`] values on the low-level
//! bind/step/reset/finalize path. Contract violations (unknown parameter
//! names, bad tag strings, use after finalize) and failures of the
//! higher-level operations (open, prepare, execute, materialize) are raised as
//! [`QuarryError`].

use thiserror::Error;

use crate::{connection::Connection, outcome::Outcome};

/// Comprehensive error type for all binding operations.
#[derive(Error, Debug)]
pub enum QuarryError {
    /// The engine could not open the database
    #[error("Unable to open database '{path}' ({outcome}): {message}")]
    Open {
        path: String,
        outcome: Outcome,
        message: String,
    },
    /// A native call reported a failing result code
    #[error("Engine error ({outcome}, code {code}): {message}")]
    Engine {
        outcome: Outcome,
        code: i32,
        message: String,
    },
    /// A named parameter did not resolve to an index
    #[error("Invalid statement parameter '{name}'")]
    UnknownParameter { name: String },
    /// A value of this kind has no engine cell representation
    #[error("Cannot bind value of type {type_name}")]
    UnbindableType { type_name: &'static str },
    /// Tag string length differs from the statement's column count
    #[error("Invalid column count {tags}, result has {columns} columns")]
    ColumnCountMismatch { tags: usize, columns: usize },
    /// Tag character outside the `iftb` alphabet
    #[error("Invalid column tag '{tag}' -- must be in 'iftb'")]
    InvalidColumnTag { tag: char },
    /// 1-based column index outside the result
    #[error("Column index {index} out of range, result has {columns} columns")]
    ColumnIndex { index: usize, columns: usize },
    /// Operation on a handle in a state that does not allow it
    #[error("Cannot {operation} a {state} handle")]
    Lifecycle {
        operation: &'static str,
        state: &'static str,
    },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

/// Builder for engine errors carrying an outcome and message.
pub struct EngineErrorBuilder {
    outcome: Outcome,
    code: i32,
}

impl EngineErrorBuilder {
    /// Start from a raw native code.
    pub fn new(code: i32) -> Self {
        Self {
            outcome: crate::outcome::translate(code),
            code,
        }
    }

    /// Build the error with the engine's message.
    pub fn with_message(self, message: impl Into<String>) -> QuarryError {
        QuarryError::Engine {
            outcome: self.outcome,
            code: self.code,
            message: message.into(),
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> QuarryError {
        QuarryError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl QuarryError {
    /// Creates a builder for engine errors from a native result code.
    pub fn engine(code: i32) -> EngineErrorBuilder {
        EngineErrorBuilder::new(code)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// The engine outcome behind this error, if it came from the engine.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            QuarryError::Open { outcome, .. } | QuarryError::Engine { outcome, .. } => {
                Some(*outcome)
            }
            _ => None,
        }
    }
}

/// Extension trait turning failing outcomes into raised errors.
///
/// Low-level calls report engine codes as `Ok(Outcome)`. Callers that would
/// rather propagate with `?` chain `.or_engine_error(&conn)`, which attaches
/// the connection's last error message.
pub trait OutcomeExt {
    fn or_engine_error(self, conn: &Connection) -> Result<Outcome>;
}

impl OutcomeExt for Result<Outcome> {
    fn or_engine_error(self, conn: &Connection) -> Result<Outcome> {
        let outcome = self?;
        if outcome.is_success() {
            return Ok(outcome);
        }
        Err(QuarryError::Engine {
            outcome,
            code: outcome.code().unwrap_or(-1),
            message: conn.last_error_message(),
        })
    }
}

/// Result type alias for binding operations
pub type Result<T> = std::result::Result<T, QuarryError>;
