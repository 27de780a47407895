//! Errors surfaced by decision store operations.

use thiserror::Error;

/// Errors from store operations.
///
/// A lookup that finds no row is never an error; it resolves to `false`,
/// zero, or `None` at the call site.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller cancelled before the operation completed.
    #[error("{op} cancelled")]
    Cancelled { op: &'static str },

    /// The caller's deadline passed before the operation completed.
    #[error("{op} deadline exceeded")]
    DeadlineExceeded { op: &'static str },

    /// SQLite rejected or could not execute the statement.
    #[error("{op} failed for {detail}")]
    Storage {
        op: &'static str,
        detail: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A pagination token that does not decode to a boundary.
    #[error("invalid pagination token: {0}")]
    InvalidCursor(String),

    /// A stored value that could not be read back.
    #[error("corrupt {column} '{value}' for {detail}")]
    CorruptRow {
        column: &'static str,
        value: String,
        detail: String,
    },

    /// A connection mutex was poisoned by a panicking holder.
    #[error("connection pool: {0}")]
    Pool(String),

    /// The blocking task running the statement panicked or was aborted.
    #[error("{op} task failed")]
    Task {
        op: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

impl StoreError {
    /// True for both caller-driven outcomes: explicit cancel and deadline expiry.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }
}

/// Attaches operation context to raw SQLite errors.
pub(crate) trait StorageContext<T> {
    fn storage(self, op: &'static str, detail: impl FnOnce() -> String) -> Result<T, StoreError>;
}

impl<T> StorageContext<T> for rusqlite::Result<T> {
    fn storage(self, op: &'static str, detail: impl FnOnce() -> String) -> Result<T, StoreError> {
        self.map_err(|source| StoreError::Storage {
            op,
            detail: detail(),
            source,
        })
    }
}
