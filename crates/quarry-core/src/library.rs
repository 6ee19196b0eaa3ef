//! Facts about the linked engine library.

use std::fmt;

use serde::Serialize;

use crate::ffi;

/// Version string of the engine library, e.g. `"3.50.2"`.
pub fn version() -> &'static str {
    rusqlite::version()
}

/// Version as a single integer, `major * 1_000_000 + minor * 1_000 + patch`.
pub fn version_number() -> i32 {
    rusqlite::version_number()
}

/// How the library was compiled with respect to threads.
///
/// Connections are opened with `SQLITE_OPEN_NOMUTEX`, which downgrades a
/// serialized build to multi-thread mode for that session. Either way a
/// single [`crate::Connection`] is driven by one thread at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadingMode {
    /// All mutexes compiled out; one thread only
    SingleThread,
    /// Separate sessions may be used from separate threads
    MultiThread,
    /// Sessions may be shared between threads
    Serialized,
}

impl ThreadingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadingMode::SingleThread => "single-thread",
            ThreadingMode::MultiThread => "multi-thread",
            ThreadingMode::Serialized => "serialized",
        }
    }
}

impl fmt::Display for ThreadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiled threading mode of the bundled library.
pub fn threading_mode() -> ThreadingMode {
    match ffi::threadsafe() {
        0 => ThreadingMode::SingleThread,
        2 => ThreadingMode::MultiThread,
        _ => ThreadingMode::Serialized,
    }
}

/// English description of a native result code, as the engine words it.
pub fn describe_code(code: i32) -> String {
    ffi::errstr(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_agrees_with_number() {
        let number = version_number();
        let expected = format!(
            "{}.{}.{}",
            number / 1_000_000,
            number / 1_000 % 1_000,
            number % 1_000
        );
        assert_eq!(version(), expected);
    }

    #[test]
    fn test_bundled_build_is_thread_aware() {
        assert_ne!(threading_mode(), ThreadingMode::SingleThread);
    }

    #[test]
    fn test_describe_code() {
        assert_eq!(describe_code(19), "constraint failed");
        assert_eq!(describe_code(0), "not an error");
    }
}
