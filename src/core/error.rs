/// Error Module
///
/// This module defines the error taxonomy for statement execution. Callers get
/// a typed error they can branch on: connection, statement, constraint and lock
/// failures are distinct variants.
use rusqlite::ErrorCode;
use thiserror::Error;

/// Error type for every operation of the crate.
#[derive(Error, Debug)]
pub enum ExecError {
    /// The database file could not be opened (permissions, corrupt file, not a database)
    #[error("Connection error ({path}): {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Malformed SQL, unknown table or column, or a parameter count mismatch
    #[error("Statement error: {0}")]
    Statement(#[source] rusqlite::Error),

    /// Uniqueness, primary key, foreign key, not-null or check violation
    #[error("Constraint error: {0}")]
    Constraint(#[source] rusqlite::Error),

    /// The database file is locked by another writer
    #[error("Lock error: {0}")]
    Lock(#[source] rusqlite::Error),

    /// The handle was used after it had been closed
    #[error("Database handle is closed")]
    Closed,

    /// Configuration parsing and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecError {
    /// Wraps an engine error raised while opening `path`.
    pub(crate) fn connection(path: impl Into<String>, source: rusqlite::Error) -> Self {
        ExecError::Connection {
            path: path.into(),
            source,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, ExecError::Connection { .. })
    }

    pub fn is_statement(&self) -> bool {
        matches!(self, ExecError::Statement(_))
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, ExecError::Constraint(_))
    }

    pub fn is_lock(&self) -> bool {
        matches!(self, ExecError::Lock(_))
    }
}

/// Classifies an engine error by its primary SQLite result code.
impl From<rusqlite::Error> for ExecError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(failure, _) => Some(failure.code),
            _ => None,
        };

        match code {
            Some(ErrorCode::ConstraintViolation) => ExecError::Constraint(err),
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => ExecError::Lock(err),
            Some(ErrorCode::CannotOpen)
            | Some(ErrorCode::NotADatabase)
            | Some(ErrorCode::DatabaseCorrupt)
            | Some(ErrorCode::PermissionDenied) => ExecError::connection(String::new(), err),
            _ => ExecError::Statement(err),
        }
    }
}

/// Type alias for Result to use ExecError as the error type.
pub type Result<T> = std::result::Result<T, ExecError>;
