// SPDX-License-Identifier: MPL-2.0
use std::fmt;

/// Failures surfaced by the durable media store.
///
/// The taxonomy follows how callers react: `StorageUnavailable` means the
/// database itself could not be opened, while read/write failures are scoped
/// to a single operation against an otherwise reachable store.
#[derive(Debug, Clone)]
pub enum Error {
    /// The database could not be opened (missing or unwritable data
    /// directory, locked file, malformed database header).
    StorageUnavailable(String),

    /// A write transaction failed or aborted (disk full, quota, lock).
    StorageWriteFailure(String),

    /// A stored record could not be read back (corrupt row, failed query).
    StorageReadFailure(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StorageUnavailable(e) => write!(f, "Storage unavailable: {}", e),
            Error::StorageWriteFailure(e) => write!(f, "Storage write failed: {}", e),
            Error::StorageReadFailure(e) => write!(f, "Storage read failed: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
