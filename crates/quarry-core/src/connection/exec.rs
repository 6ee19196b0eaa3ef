//! Direct execution of SQL text.

use std::{ffi::CString, ops::ControlFlow};

use log::debug;
use rusqlite::ffi as sys;

use crate::{
    error::{QuarryError, Result},
    ffi::ExecCallback,
    outcome::{translate, Outcome},
};

impl super::Connection {
    /// Runs every statement in `sql`, discarding any rows.
    pub fn execute(&self, sql: &str) -> Result<Outcome> {
        self.run_exec(sql, None)
    }

    /// Runs every statement in `sql`, calling `on_row` with the column names
    /// and the text of each value for every result row.
    ///
    /// Returning [`ControlFlow::Break`] stops execution; the call then fails
    /// with an `abort` engine error. A panic inside `on_row` is caught and
    /// treated the same way. The callback may call [`Self::interrupt`], in
    /// which case the error carries `interrupt`.
    ///
    /// ```rust
    /// use std::ops::ControlFlow;
    /// use quarry_core::Connection;
    ///
    /// # fn main() -> quarry_core::Result<()> {
    /// let conn = Connection::open_in_memory()?;
    /// let mut seen = Vec::new();
    /// conn.execute_with("SELECT 1 AS n, NULL AS z", |names, values| {
    ///     seen.push((names.to_vec(), values.to_vec()));
    ///     ControlFlow::Continue(())
    /// })?;
    /// assert_eq!(seen[0].0, vec!["n", "z"]);
    /// assert_eq!(seen[0].1, vec![Some("1".to_string()), None]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn execute_with<F>(&self, sql: &str, mut on_row: F) -> Result<Outcome>
    where
        F: FnMut(&[String], &[Option<String>]) -> ControlFlow<()>,
    {
        let mut forward = |names: &[Option<String>], values: &[Option<String>]| {
            let names: Vec<String> = names.iter().map(|n| n.clone().unwrap_or_default()).collect();
            on_row(&names, values).is_continue()
        };
        let callback: &mut ExecCallback<'_> = &mut forward;
        self.run_exec(sql, Some(callback))
    }

    fn run_exec(&self, sql: &str, callback: Option<&mut ExecCallback<'_>>) -> Result<Outcome> {
        let raw = self.raw("execute on")?;
        let c_sql = CString::new(sql).map_err(|_| {
            QuarryError::invalid_input("sql").with_reason("SQL text contains a NUL byte")
        })?;

        debug!("exec: {}", sql.trim());
        let status = raw.exec(&c_sql, callback);
        if status.code == sys::SQLITE_OK {
            return Ok(translate(status.code));
        }

        let message = if status.callback_panicked {
            "row callback panicked".to_string()
        } else {
            status
                .message
                .unwrap_or_else(|| self.last_error_message())
        };
        Err(QuarryError::engine(status.code).with_message(message))
    }
}
