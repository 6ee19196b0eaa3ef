//! Builder for opening and configuring connections.

use std::{
    ffi::CString,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, info};
use rusqlite::ffi as sys;

use super::{Connection, MEMORY_PATH};
use crate::{
    error::{QuarryError, Result},
    ffi::RawDb,
    outcome::translate,
};

/// Builder for opening a [`Connection`].
#[derive(Debug, Clone)]
pub struct ConnectionBuilder {
    database_path: Option<PathBuf>,
    read_only: bool,
    create: bool,
    busy_timeout: Option<Duration>,
}

impl ConnectionBuilder {
    /// Creates a builder for a read-write in-memory database.
    pub fn new() -> Self {
        Self {
            database_path: None,
            read_only: false,
            create: true,
            busy_timeout: None,
        }
    }

    /// Sets the database file path.
    ///
    /// If not specified, a private in-memory database is opened.
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Opens the database read-only. Read-only sessions never create files.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Whether a missing database file is created (default `true`).
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.busy_timeout = timeout;
        self
    }

    fn flags(&self) -> i32 {
        let mode = if self.read_only {
            sys::SQLITE_OPEN_READONLY
        } else if self.create {
            sys::SQLITE_OPEN_READWRITE | sys::SQLITE_OPEN_CREATE
        } else {
            sys::SQLITE_OPEN_READWRITE
        };
        mode | sys::SQLITE_OPEN_NOMUTEX
    }

    /// Opens the configured session.
    ///
    /// # Errors
    ///
    /// Returns `QuarryError::InvalidInput` if the path is not valid UTF-8 or
    /// contains a NUL byte
    /// Returns `QuarryError::Open` if the engine refuses to open the database
    pub fn open(self) -> Result<Connection> {
        let path = match &self.database_path {
            Some(path) => path
                .to_str()
                .ok_or_else(|| {
                    QuarryError::invalid_input("path")
                        .with_reason(format!("'{}' is not valid UTF-8", path.display()))
                })?
                .to_string(),
            None => MEMORY_PATH.to_string(),
        };
        let c_path = CString::new(path.as_str()).map_err(|_| {
            QuarryError::invalid_input("path").with_reason("path contains a NUL byte")
        })?;

        let raw = RawDb::open(&c_path, self.flags()).map_err(|failure| QuarryError::Open {
            path: path.clone(),
            outcome: translate(failure.code),
            message: failure.message,
        })?;
        let conn = Connection::from_raw(raw, path);

        if let Some(timeout) = self.busy_timeout {
            debug!("busy timeout set to {}ms", timeout.as_millis());
            conn.set_busy_timeout(timeout)?;
        }

        info!(
            "opened database '{}'{}",
            conn.path(),
            if self.read_only { " (read-only)" } else { "" }
        );
        Ok(conn)
    }
}

impl Default for ConnectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
