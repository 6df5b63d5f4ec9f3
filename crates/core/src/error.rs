//! Unified error types for gridview.
//!
//! The split matters for the API layer: input errors surface to the caller,
//! database errors are logged server-side and replaced with a generic message.

use tokio_rusqlite::rusqlite;

/// Unified error types for the gridview backend.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid request input (bad operator, malformed parameter, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Field name outside the column allowlist.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
