//! Prepared statement handle and its execution state machine.
//!
//! ```text
//!            step: row              step: done
//! Prepared ────────────▶ HasRow ────────────────▶ Done
//!    ▲                    │  ▲ step: row            │
//!    │                    └──┘                      │
//!    └──────────────── reset ◀──────────────────────┘
//!
//! any state ── finalize ──▶ Finalized
//! ```
//!
//! Binding lives in [`crate::marshal`] and column reads in
//! [`crate::marshal::columns`]; both extend [`Statement`] with further
//! `impl` blocks.

use std::{ffi::CString, fmt, os::raw::c_int};

use log::{debug, trace};

use crate::{
    connection::Connection,
    error::{QuarryError, Result},
    ffi::RawStmt,
    outcome::{translate, Outcome},
};

/// Execution state of a [`Statement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementState {
    /// Freshly prepared or reset; no step taken yet
    Prepared,
    /// The last step produced a row; column values are readable
    HasRow,
    /// The last step ran to completion
    Done,
    /// Finalized; no further operation is valid
    Finalized,
}

impl StatementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementState::Prepared => "prepared",
            StatementState::HasRow => "row-available",
            StatementState::Done => "done",
            StatementState::Finalized => "finalized",
        }
    }
}

/// One prepared SQL statement.
///
/// Borrows the [`Connection`] that prepared it, so it can never outlive that
/// session. Finalized by [`Statement::finalize`] or on drop, whichever comes
/// first.
pub struct Statement<'conn> {
    raw: Option<RawStmt>,
    conn: &'conn Connection,
    state: StatementState,
}

impl<'conn> Statement<'conn> {
    pub(crate) fn new(raw: RawStmt, conn: &'conn Connection) -> Self {
        Self {
            raw: Some(raw),
            conn,
            state: StatementState::Prepared,
        }
    }

    /// The live native handle, or a lifecycle error once finalized.
    pub(crate) fn raw(&self, operation: &'static str) -> Result<&RawStmt> {
        self.raw.as_ref().ok_or(QuarryError::Lifecycle {
            operation,
            state: StatementState::Finalized.as_str(),
        })
    }

    /// Like [`Statement::raw`] but also requires a current row.
    pub(crate) fn row_raw(&self, operation: &'static str) -> Result<&RawStmt> {
        let raw = self.raw(operation)?;
        if self.state != StatementState::HasRow {
            return Err(QuarryError::Lifecycle {
                operation,
                state: self.state.as_str(),
            });
        }
        Ok(raw)
    }

    pub fn state(&self) -> StatementState {
        self.state
    }

    /// The connection this statement was prepared on.
    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    /// Advances execution by one row.
    ///
    /// `row` moves to [`StatementState::HasRow`], `done` to
    /// [`StatementState::Done`]. Any other outcome is returned as is and the
    /// state is left untouched for the caller to inspect.
    pub fn step(&mut self) -> Result<Outcome> {
        let outcome = translate(self.raw("step")?.step());
        trace!("step -> {outcome}");
        match outcome {
            Outcome::Row => self.state = StatementState::HasRow,
            Outcome::Done => self.state = StatementState::Done,
            _ => {}
        }
        Ok(outcome)
    }

    /// Rewinds execution to the start. Bound parameters are kept.
    pub fn reset(&mut self) -> Result<Outcome> {
        let outcome = translate(self.raw("reset")?.reset());
        self.state = StatementState::Prepared;
        Ok(outcome)
    }

    /// Releases the native statement. A second call is a lifecycle error.
    pub fn finalize(&mut self) -> Result<Outcome> {
        let raw = self.raw.take().ok_or(QuarryError::Lifecycle {
            operation: "finalize",
            state: StatementState::Finalized.as_str(),
        })?;
        self.state = StatementState::Finalized;
        Ok(translate(raw.finalize()))
    }

    /// Sets every parameter back to NULL. [`Statement::reset`] never does this.
    pub fn clear_bindings(&mut self) -> Result<Outcome> {
        Ok(translate(self.raw("clear bindings of")?.clear_bindings()))
    }

    pub fn parameter_count(&self) -> Result<usize> {
        let count = self.raw("count parameters of")?.parameter_count();
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// 1-based index of a named parameter, `0` when no parameter has that
    /// name. The name includes its tag character, e.g. `":id"`.
    pub fn parameter_index(&self, name: &str) -> Result<usize> {
        let raw = self.raw("look up parameters of")?;
        // A name with an interior NUL can never match a parameter.
        let Ok(name) = CString::new(name) else {
            return Ok(0);
        };
        Ok(usize::try_from(raw.parameter_index(&name)).unwrap_or(0))
    }

    /// Name of the parameter at a 1-based index; `None` for nameless `?`
    /// parameters or indices out of range.
    pub fn parameter_name(&self, index: usize) -> Result<Option<String>> {
        let raw = self.raw("look up parameters of")?;
        Ok(c_int::try_from(index)
            .ok()
            .and_then(|index| raw.parameter_name(index)))
    }

    pub fn column_count(&self) -> Result<usize> {
        let count = self.raw("count columns of")?.column_count();
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Name of the column at a 1-based index.
    pub fn column_name(&self, index: usize) -> Result<String> {
        let column = self.column_offset(index)?;
        let raw = self.raw("name columns of")?;
        Ok(raw.column_name(column).unwrap_or_default())
    }

    /// All column names in result order.
    pub fn column_names(&self) -> Result<Vec<String>> {
        (1..=self.column_count()?)
            .map(|index| self.column_name(index))
            .collect()
    }

    /// SQL text this statement was prepared from.
    pub fn sql(&self) -> Result<String> {
        Ok(self.raw("read the SQL of")?.sql().unwrap_or_default())
    }

    /// Converts a caller-facing 1-based column index to the engine's 0-based
    /// offset, rejecting indices outside the result.
    pub(crate) fn column_offset(&self, index: usize) -> Result<c_int> {
        let columns = self.column_count()?;
        if index == 0 || index > columns {
            return Err(QuarryError::ColumnIndex { index, columns });
        }
        c_int::try_from(index - 1).map_err(|_| QuarryError::ColumnIndex { index, columns })
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            let outcome = translate(raw.finalize());
            debug!("finalized statement on drop ({outcome})");
        }
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("state", &self.state)
            .field("sql", &self.raw.as_ref().and_then(RawStmt::sql))
            .finish_non_exhaustive()
    }
}
