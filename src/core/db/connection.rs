/// Connection Management Module
///
/// This module owns the lifecycle of a single database handle: opening (and
/// creating) the file, applying configured pragmas, running a write inside one
/// transaction, and closing. A handle is never shared; whoever opens it closes
/// it, and dropping it closes it on every exit path.

use crate::config::SqliteConfig;
use crate::core::{ExecError, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::{debug, warn};

/// An open connection to one file-backed database.
#[derive(Debug)]
pub struct DatabaseHandle {
    /// Active connection (None once closed)
    connection: Option<Connection>,
    /// Path the handle was opened with
    path: String,
}

impl DatabaseHandle {
    /// Opens the database at `path`, creating the file if it does not exist.
    ///
    /// The file header is read immediately so that a corrupt file or a file that
    /// is not a database fails here with `ExecError::Connection` instead of at
    /// the first statement. An invalid `config` fails with `ExecError::Config`
    /// before the file is touched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sqlite_exec::{DatabaseHandle, SqliteConfig};
    ///
    /// let mut handle = DatabaseHandle::open("example.db", &SqliteConfig::default())?;
    /// handle.close();
    /// # Ok::<(), sqlite_exec::ExecError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, config: &SqliteConfig) -> Result<Self> {
        config.validate()?;

        let path = path.as_ref();
        let path_str = path.display().to_string();

        let conn = Connection::open(path).map_err(|e| ExecError::connection(&path_str, e))?;
        configure(&conn, config).map_err(|e| with_path(e, &path_str))?;

        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| with_path(ExecError::from(e), &path_str))?;

        debug!("Opened database {}", path_str);
        Ok(DatabaseHandle {
            connection: Some(conn),
            path: path_str,
        })
    }

    /// Path the handle was opened with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Checks whether the handle still holds a live connection.
    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Borrows the live connection.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Closed` after [`DatabaseHandle::close`].
    pub fn connection(&self) -> Result<&Connection> {
        self.connection.as_ref().ok_or(ExecError::Closed)
    }

    /// Runs `f` inside one transaction and commits it.
    ///
    /// If `f` or the commit fails, the transaction is dropped uncommitted and
    /// rolled back, so the statement either fully applies or not at all.
    pub fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let conn = self.connection.as_mut().ok_or(ExecError::Closed)?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Releases the connection. Calling it on a closed handle is a no-op, and it
    /// never fails: an engine error on close is logged and the connection dropped.
    pub fn close(&mut self) {
        if let Some(conn) = self.connection.take() {
            match conn.close() {
                Ok(()) => debug!("Closed database {}", self.path),
                Err((conn, e)) => {
                    warn!("Failed to close database {} cleanly: {}", self.path, e);
                    drop(conn);
                }
            }
        }
    }
}

impl Drop for DatabaseHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Applies the configured pragmas to a freshly opened connection.
///
/// Foreign keys are always set explicitly: the bundled engine is compiled with
/// them on, while an unset `foreign_keys` means off.
fn configure(conn: &Connection, config: &SqliteConfig) -> Result<()> {
    // Set first so that the header probe and pragmas below honour it.
    if let Some(timeout) = config.busy_timeout() {
        conn.busy_timeout(timeout)?;
    }

    conn.pragma_update(None, "foreign_keys", config.foreign_keys.unwrap_or(false))?;

    if let Some(mode) = &config.journal_mode {
        let applied: String =
            conn.pragma_update_and_check(None, "journal_mode", mode, |row| row.get(0))?;
        debug!("journal_mode set to {}", applied);
    }

    Ok(())
}

/// Attaches the path to connection-class errors raised after the file opened.
fn with_path(err: ExecError, path: &str) -> ExecError {
    match err {
        ExecError::Connection { source, .. } => ExecError::connection(path, source),
        other => other,
    }
}

/// Opens a handle with the default configuration.
pub fn open<P: AsRef<Path>>(path: P) -> Result<DatabaseHandle> {
    DatabaseHandle::open(path, &SqliteConfig::default())
}

/// Closes a handle; a no-op if it is already closed.
pub fn close(handle: &mut DatabaseHandle) {
    handle.close();
}
