//! Database session handle.
//!
//! A [`Connection`] owns one engine session. Statements prepared from it
//! borrow it, so the borrow checker rules out closing a session while any of
//! its statements is alive. Execution entry points are split across
//! submodules: [`exec`] runs SQL text directly and [`crate::table`]
//! materializes query results.

use std::{fmt, time::Duration};

use log::{debug, warn};
use rusqlite::ffi as sys;

use crate::{
    error::{QuarryError, Result},
    ffi::RawDb,
    outcome::{translate, Outcome},
    statement::Statement,
};

pub mod builder;
pub mod exec;

pub use builder::ConnectionBuilder;

/// Path that opens a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// An open database session.
pub struct Connection {
    raw: Option<RawDb>,
    path: String,
}

impl Connection {
    pub(crate) fn from_raw(raw: RawDb, path: String) -> Self {
        Self {
            raw: Some(raw),
            path,
        }
    }

    /// Opens (creating if needed) the database at `path` for reading and
    /// writing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        ConnectionBuilder::new()
            .with_database_path(Some(path))
            .open()
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        ConnectionBuilder::new().open()
    }

    pub(crate) fn raw(&self, operation: &'static str) -> Result<&RawDb> {
        self.raw.as_ref().ok_or(QuarryError::Lifecycle {
            operation,
            state: "closed",
        })
    }

    /// Closes the session.
    ///
    /// A second close is a lifecycle error. If the engine refuses to close
    /// (it reports `busy` while statements are unfinalized), the session
    /// stays open and the outcome is returned so the caller can retry.
    pub fn close(&mut self) -> Result<Outcome> {
        let raw = self.raw.take().ok_or(QuarryError::Lifecycle {
            operation: "close",
            state: "closed",
        })?;
        match raw.close() {
            Ok(()) => {
                debug!("closed database '{}'", self.path);
                Ok(Outcome::Ok)
            }
            Err((code, raw)) => {
                self.raw = Some(raw);
                Ok(translate(code))
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.raw.is_none()
    }

    /// Path the session was opened with (`:memory:` for in-memory).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Primary result code of the most recent failed engine call; `misuse`
    /// once the session is closed.
    pub fn last_error_code(&self) -> i32 {
        self.raw
            .as_ref()
            .map_or(sys::SQLITE_MISUSE, RawDb::errcode)
    }

    /// English message for the most recent failed engine call.
    pub fn last_error_message(&self) -> String {
        match &self.raw {
            Some(raw) => raw.errmsg(),
            None => "database connection is closed".to_string(),
        }
    }

    /// Compiles the first statement of `sql`, returning it with the
    /// unconsumed remainder of the text.
    ///
    /// Leading empty statements (stray `;`) are skipped. Text with no
    /// statement at all, or containing a NUL byte, fails with
    /// [`QuarryError::InvalidInput`]; a compile failure raises [`QuarryError::Engine`] with the engine's message.
    ///
    /// ```rust
    /// use quarry_core::Connection;
    ///
    /// # fn main() -> quarry_core::Result<()> {
    /// let conn = Connection::open_in_memory()?;
    /// let (stmt, tail) = conn.prepare("SELECT 1; SELECT 2")?;
    /// assert_eq!(stmt.column_count()?, 1);
    /// assert_eq!(tail.trim(), "SELECT 2");
    /// # Ok(())
    /// # }
    /// ```
    pub fn prepare<'s>(&self, sql: &'s str) -> Result<(Statement<'_>, &'s str)> {
        let mut rest = sql;
        loop {
            let (stmt, tail) = self.prepare_next(rest)?;
            if let Some(stmt) = stmt {
                return Ok((stmt, tail));
            }
            if tail.len() == rest.len() || tail.trim().is_empty() {
                return Err(QuarryError::invalid_input("sql")
                    .with_reason("no SQL statement found in input"));
            }
            rest = tail;
        }
    }

    /// Compiles one statement. `None` means the consumed text held only
    /// whitespace, comments or an empty statement.
    pub(crate) fn prepare_next<'s>(
        &self,
        sql: &'s str,
    ) -> Result<(Option<Statement<'_>>, &'s str)> {
        let raw = self.raw("prepare on")?;
        if sql.contains('\0') {
            return Err(
                QuarryError::invalid_input("sql").with_reason("SQL text contains a NUL byte")
            );
        }
        let status = raw.prepare(sql);
        if status.code != sys::SQLITE_OK {
            return Err(self.engine_error(status.code));
        }
        let head = sql.get(..status.consumed).unwrap_or(sql);
        let tail = sql.get(status.consumed..).unwrap_or_default();
        let stmt = status.stmt.map(|stmt| {
            debug!("prepared: {}", head.trim());
            Statement::new(stmt, self)
        });
        Ok((stmt, tail))
    }

    /// Builds an [`QuarryError::Engine`] from a code and the session's
    /// current error message.
    pub(crate) fn engine_error(&self, code: i32) -> QuarryError {
        QuarryError::engine(code).with_message(self.last_error_message())
    }

    /// Rows modified by the most recent INSERT, UPDATE or DELETE.
    pub fn changes(&self) -> Result<u64> {
        let changes = self.raw("count changes on")?.changes();
        Ok(u64::try_from(changes).unwrap_or(0))
    }

    pub fn last_insert_rowid(&self) -> Result<i64> {
        Ok(self.raw("read the last rowid of")?.last_insert_rowid())
    }

    /// Asks any running statement on this session to stop at its next
    /// opportunity; it then reports `interrupt`. Safe to call from a row
    /// callback.
    pub fn interrupt(&self) -> Result<()> {
        self.raw("interrupt")?.interrupt();
        Ok(())
    }

    /// Retries for up to `timeout` when a table is locked by another
    /// session instead of failing with `busy` at once. A zero duration turns
    /// the retry off.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<Outcome> {
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        Ok(translate(self.raw("configure")?.busy_timeout(millis)))
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.raw.is_none() {
            return;
        }
        match self.close() {
            Ok(Outcome::Ok) => {}
            Ok(outcome) => warn!("failed to close database '{}' on drop ({outcome})", self.path),
            Err(e) => warn!("failed to close database '{}' on drop: {e}", self.path),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}
