//! Native boundary over the bundled SQLite library.
//!
//! This is the only module that contains `unsafe` code. It owns the raw
//! session and statement pointers and hands plain integer result codes back
//! to the safe layer ([`crate::connection`], [`crate::statement`]), which
//! translates them into outcomes.
//!
//! Text and blob parameters are always bound with `SQLITE_TRANSIENT`, so the
//! engine copies the bytes before the call returns and the caller's buffer
//! may be dropped or mutated immediately afterwards.

#![allow(unsafe_code)]

use std::{
    ffi::{c_char, c_int, c_void, CStr},
    panic::{self, AssertUnwindSafe},
    ptr::{self, NonNull},
    slice,
};

use rusqlite::ffi;

/// Row callback used by [`RawDb::exec`]: `(names, values) -> keep going`.
pub(crate) type ExecCallback<'a> = dyn FnMut(&[Option<String>], &[Option<String>]) -> bool + 'a;

/// Failure details captured from a session that could not be opened.
pub(crate) struct OpenFailure {
    pub code: c_int,
    pub message: String,
}

/// Completion report of [`RawDb::exec`].
pub(crate) struct ExecStatus {
    pub code: c_int,
    pub message: Option<String>,
    pub callback_panicked: bool,
}

/// Completion report of [`RawDb::prepare`].
pub(crate) struct PrepareStatus {
    pub code: c_int,
    pub stmt: Option<RawStmt>,
    /// Bytes of the input consumed by the prepared statement.
    pub consumed: usize,
}

/// Owned `sqlite3*` session handle.
pub(crate) struct RawDb {
    handle: NonNull<ffi::sqlite3>,
}

// A session is driven by whichever single thread owns the connection.
// `Connection` does not implement `Sync`, so no two threads share one.
unsafe impl Send for RawDb {}

impl RawDb {
    /// Opens a session, returning the engine's message when it refuses.
    pub fn open(path: &CStr, flags: c_int) -> Result<Self, OpenFailure> {
        let mut db: *mut ffi::sqlite3 = ptr::null_mut();
        let code = unsafe { ffi::sqlite3_open_v2(path.as_ptr(), &mut db, flags, ptr::null()) };

        if code == ffi::SQLITE_OK {
            if let Some(handle) = NonNull::new(db) {
                return Ok(Self { handle });
            }
        }

        // The engine allocates a handle even on failure so the message can be
        // read; it still has to be released.
        let message = if db.is_null() {
            errstr(code)
        } else {
            unsafe {
                let message = copy_c_string(ffi::sqlite3_errmsg(db)).unwrap_or_default();
                ffi::sqlite3_close(db);
                message
            }
        };
        Err(OpenFailure { code, message })
    }

    /// Closes the session. On failure the handle is returned so the caller
    /// can keep it alive and retry.
    pub fn close(self) -> Result<(), (c_int, RawDb)> {
        let code = unsafe { ffi::sqlite3_close(self.handle.as_ptr()) };
        if code == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err((code, self))
        }
    }

    pub fn errcode(&self) -> c_int {
        unsafe { ffi::sqlite3_errcode(self.handle.as_ptr()) }
    }

    pub fn errmsg(&self) -> String {
        unsafe { copy_c_string(ffi::sqlite3_errmsg(self.handle.as_ptr())).unwrap_or_default() }
    }

    pub fn changes(&self) -> c_int {
        unsafe { ffi::sqlite3_changes(self.handle.as_ptr()) }
    }

    pub fn last_insert_rowid(&self) -> i64 {
        unsafe { ffi::sqlite3_last_insert_rowid(self.handle.as_ptr()) }
    }

    pub fn interrupt(&self) {
        unsafe { ffi::sqlite3_interrupt(self.handle.as_ptr()) }
    }

    pub fn busy_timeout(&self, millis: c_int) -> c_int {
        unsafe { ffi::sqlite3_busy_timeout(self.handle.as_ptr(), millis) }
    }

    /// Runs every statement in `sql`, invoking `callback` once per row.
    pub fn exec(&self, sql: &CStr, callback: Option<&mut ExecCallback<'_>>) -> ExecStatus {
        let mut errmsg: *mut c_char = ptr::null_mut();

        let (code, callback_panicked) = match callback {
            Some(callback) => {
                let mut context = ExecContext {
                    callback,
                    panicked: false,
                };
                let code = unsafe {
                    ffi::sqlite3_exec(
                        self.handle.as_ptr(),
                        sql.as_ptr(),
                        Some(exec_trampoline),
                        (&mut context as *mut ExecContext<'_, '_>).cast::<c_void>(),
                        &mut errmsg,
                    )
                };
                (code, context.panicked)
            }
            None => {
                let code = unsafe {
                    ffi::sqlite3_exec(
                        self.handle.as_ptr(),
                        sql.as_ptr(),
                        None,
                        ptr::null_mut(),
                        &mut errmsg,
                    )
                };
                (code, false)
            }
        };

        ExecStatus {
            code,
            message: unsafe { take_engine_string(errmsg) },
            callback_panicked,
        }
    }

    /// Prepares the first statement in `sql`.
    ///
    /// `stmt` is `None` when the input held no statement (only whitespace or
    /// comments) or when preparation failed.
    pub fn prepare(&self, sql: &str) -> PrepareStatus {
        let Ok(len) = c_int::try_from(sql.len()) else {
            return PrepareStatus {
                code: ffi::SQLITE_TOOBIG,
                stmt: None,
                consumed: 0,
            };
        };

        let head = sql.as_ptr().cast::<c_char>();
        let mut stmt: *mut ffi::sqlite3_stmt = ptr::null_mut();
        let mut tail: *const c_char = ptr::null();
        let code =
            unsafe { ffi::sqlite3_prepare_v2(self.handle.as_ptr(), head, len, &mut stmt, &mut tail) };

        let consumed = if tail.is_null() {
            sql.len()
        } else {
            let offset = unsafe { tail.offset_from(head) };
            usize::try_from(offset).map_or(sql.len(), |offset| offset.min(sql.len()))
        };

        PrepareStatus {
            code,
            stmt: NonNull::new(stmt).map(|handle| RawStmt { handle }),
            consumed,
        }
    }
}

/// Owned `sqlite3_stmt*` handle.
pub(crate) struct RawStmt {
    handle: NonNull<ffi::sqlite3_stmt>,
}

impl RawStmt {
    pub fn step(&self) -> c_int {
        unsafe { ffi::sqlite3_step(self.handle.as_ptr()) }
    }

    pub fn reset(&self) -> c_int {
        unsafe { ffi::sqlite3_reset(self.handle.as_ptr()) }
    }

    pub fn finalize(self) -> c_int {
        unsafe { ffi::sqlite3_finalize(self.handle.as_ptr()) }
    }

    pub fn clear_bindings(&self) -> c_int {
        unsafe { ffi::sqlite3_clear_bindings(self.handle.as_ptr()) }
    }

    pub fn sql(&self) -> Option<String> {
        unsafe { copy_c_string(ffi::sqlite3_sql(self.handle.as_ptr())) }
    }

    pub fn bind_null(&self, index: c_int) -> c_int {
        unsafe { ffi::sqlite3_bind_null(self.handle.as_ptr(), index) }
    }

    pub fn bind_int(&self, index: c_int, value: c_int) -> c_int {
        unsafe { ffi::sqlite3_bind_int(self.handle.as_ptr(), index, value) }
    }

    pub fn bind_int64(&self, index: c_int, value: i64) -> c_int {
        unsafe { ffi::sqlite3_bind_int64(self.handle.as_ptr(), index, value) }
    }

    pub fn bind_double(&self, index: c_int, value: f64) -> c_int {
        unsafe { ffi::sqlite3_bind_double(self.handle.as_ptr(), index, value) }
    }

    pub fn bind_text(&self, index: c_int, value: &str) -> c_int {
        let Ok(len) = c_int::try_from(value.len()) else {
            return ffi::SQLITE_TOOBIG;
        };
        unsafe {
            ffi::sqlite3_bind_text(
                self.handle.as_ptr(),
                index,
                value.as_ptr().cast::<c_char>(),
                len,
                ffi::SQLITE_TRANSIENT(),
            )
        }
    }

    pub fn bind_blob(&self, index: c_int, value: &[u8]) -> c_int {
        let Ok(len) = c_int::try_from(value.len()) else {
            return ffi::SQLITE_TOOBIG;
        };
        unsafe {
            ffi::sqlite3_bind_blob(
                self.handle.as_ptr(),
                index,
                value.as_ptr().cast::<c_void>(),
                len,
                ffi::SQLITE_TRANSIENT(),
            )
        }
    }

    pub fn parameter_count(&self) -> c_int {
        unsafe { ffi::sqlite3_bind_parameter_count(self.handle.as_ptr()) }
    }

    /// 0 when no parameter has this name.
    pub fn parameter_index(&self, name: &CStr) -> c_int {
        unsafe { ffi::sqlite3_bind_parameter_index(self.handle.as_ptr(), name.as_ptr()) }
    }

    pub fn parameter_name(&self, index: c_int) -> Option<String> {
        unsafe { copy_c_string(ffi::sqlite3_bind_parameter_name(self.handle.as_ptr(), index)) }
    }

    pub fn column_count(&self) -> c_int {
        unsafe { ffi::sqlite3_column_count(self.handle.as_ptr()) }
    }

    pub fn column_name(&self, column: c_int) -> Option<String> {
        unsafe { copy_c_string(ffi::sqlite3_column_name(self.handle.as_ptr(), column)) }
    }

    pub fn column_type(&self, column: c_int) -> c_int {
        unsafe { ffi::sqlite3_column_type(self.handle.as_ptr(), column) }
    }

    pub fn column_int64(&self, column: c_int) -> i64 {
        unsafe { ffi::sqlite3_column_int64(self.handle.as_ptr(), column) }
    }

    pub fn column_double(&self, column: c_int) -> f64 {
        unsafe { ffi::sqlite3_column_double(self.handle.as_ptr(), column) }
    }

    /// Copies the column's text bytes; `None` for SQL NULL.
    pub fn column_text(&self, column: c_int) -> Option<Vec<u8>> {
        unsafe {
            // The pointer must be fetched before the length, per the engine's
            // conversion rules.
            let text = ffi::sqlite3_column_text(self.handle.as_ptr(), column);
            if text.is_null() {
                return None;
            }
            let len = ffi::sqlite3_column_bytes(self.handle.as_ptr(), column);
            Some(copy_bytes(text.cast::<u8>(), len))
        }
    }

    /// Copies the column's blob bytes; empty for SQL NULL or a zero-length blob.
    pub fn column_blob(&self, column: c_int) -> Vec<u8> {
        unsafe {
            let blob = ffi::sqlite3_column_blob(self.handle.as_ptr(), column);
            if blob.is_null() {
                return Vec::new();
            }
            let len = ffi::sqlite3_column_bytes(self.handle.as_ptr(), column);
            copy_bytes(blob.cast::<u8>(), len)
        }
    }
}

/// Compiled threading mode of the bundled library (0, 1 or 2).
pub(crate) fn threadsafe() -> c_int {
    unsafe { ffi::sqlite3_threadsafe() }
}

/// English description of a result code.
pub(crate) fn errstr(code: c_int) -> String {
    unsafe { copy_c_string(ffi::sqlite3_errstr(code)).unwrap_or_default() }
}

struct ExecContext<'a, 'b> {
    callback: &'a mut ExecCallback<'b>,
    panicked: bool,
}

/// C-level row callback. Returning non-zero makes the engine stop with
/// `SQLITE_ABORT`. Panics must not cross back into C, so they are caught here
/// and turned into that abort signal.
unsafe extern "C" fn exec_trampoline(
    context: *mut c_void,
    columns: c_int,
    values: *mut *mut c_char,
    names: *mut *mut c_char,
) -> c_int {
    let context = unsafe { &mut *context.cast::<ExecContext<'_, '_>>() };
    let count = usize::try_from(columns).unwrap_or(0);
    let names = unsafe { collect_cells(names, count) };
    let values = unsafe { collect_cells(values, count) };

    let callback = &mut *context.callback;
    match panic::catch_unwind(AssertUnwindSafe(|| callback(&names, &values))) {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => {
            context.panicked = true;
            1
        }
    }
}

unsafe fn collect_cells(cells: *mut *mut c_char, count: usize) -> Vec<Option<String>> {
    if cells.is_null() {
        return vec![None; count];
    }
    unsafe {
        slice::from_raw_parts(cells, count)
            .iter()
            .map(|&cell| copy_c_string(cell))
            .collect()
    }
}

unsafe fn copy_c_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

unsafe fn copy_bytes(ptr: *const u8, len: c_int) -> Vec<u8> {
    match usize::try_from(len) {
        Ok(len) if len > 0 => unsafe { slice::from_raw_parts(ptr, len) }.to_vec(),
        _ => Vec::new(),
    }
}

/// Copies and frees a message string allocated by the engine.
unsafe fn take_engine_string(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    unsafe {
        let message = copy_c_string(ptr);
        ffi::sqlite3_free(ptr.cast::<c_void>());
        message
    }
}
