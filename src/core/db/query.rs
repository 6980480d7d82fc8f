/// Query Execution Module
///
/// This module provides the statement executor: every operation opens its own
/// handle, runs exactly one parameterized statement (or one prepared statement
/// repeated over a batch), and closes the handle before returning. Writes are
/// committed as one transaction per call; reads run without one.

use crate::config::SqliteConfig;
use crate::core::db::connection::DatabaseHandle;
use crate::core::{ExecError, Result, Row, RowSet, Value};
use rusqlite::{params_from_iter, Batch, Connection, OptionalExtension, Statement};
use std::path::Path;
use tracing::debug;

/// Executes single statements against a database file, one handle per call.
#[derive(Debug, Default, Clone)]
pub struct StatementExecutor {
    config: SqliteConfig,
}

impl StatementExecutor {
    /// Creates an executor with the default configuration (foreign keys off)
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor that applies `config` to every handle it opens
    pub fn with_config(config: SqliteConfig) -> Self {
        StatementExecutor { config }
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Opens a handle with this executor's settings.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<DatabaseHandle> {
        DatabaseHandle::open(path, &self.config)
    }

    /// Executes a DDL statement (typically `CREATE TABLE IF NOT EXISTS`) and commits it.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Statement` for invalid DDL.
    pub fn create_table<P: AsRef<Path>>(&self, path: P, ddl: &str) -> Result<()> {
        self.write(path, ddl, |tx| {
            prepare_single(tx, ddl)?.execute([])?;
            Ok(())
        })
    }

    /// Inserts one row and returns the rowid the engine assigned to it.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Constraint` on a uniqueness, primary key or not-null
    /// violation; the table is left unchanged.
    pub fn insert_one<P: AsRef<Path>>(&self, path: P, sql: &str, params: &[Value]) -> Result<i64> {
        self.write(path, sql, |tx| {
            prepare_single(tx, sql)?.execute(params_from_iter(params))?;
            let row_id = tx.last_insert_rowid();
            debug!("Inserted row {}", row_id);
            Ok(row_id)
        })
    }

    /// Inserts every row of `rows` with the same statement, as one batch.
    ///
    /// The batch is all-or-nothing: one failing row rolls back the rows before
    /// it. Returns the rowid of the last inserted row, or `None` for an empty batch.
    pub fn insert_many<P: AsRef<Path>>(&self, path: P, sql: &str, rows: &[Row]) -> Result<Option<i64>> {
        self.write(path, sql, |tx| {
            let mut stmt = prepare_single(tx, sql)?;
            for row in rows {
                stmt.execute(params_from_iter(row))?;
            }

            if rows.is_empty() {
                return Ok(None);
            }
            let row_id = tx.last_insert_rowid();
            debug!("Inserted {} rows, last row {}", rows.len(), row_id);
            Ok(Some(row_id))
        })
    }

    /// Fetches the first row a query yields, or `None` when nothing matches.
    pub fn select_one<P: AsRef<Path>>(&self, path: P, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        self.read(path, sql, |handle| {
            let mut stmt = prepare_single(handle.connection()?, sql)?;
            let column_count = stmt.column_count();
            let row = stmt
                .query_row(params_from_iter(params), |row| read_row(row, column_count))
                .optional()?;
            Ok(row)
        })
    }

    /// Fetches every row a query yields, in engine order. Zero matches is an
    /// empty set, not an error.
    pub fn select_many<P: AsRef<Path>>(&self, path: P, sql: &str, params: &[Value]) -> Result<RowSet> {
        self.read(path, sql, |handle| {
            let mut stmt = prepare_single(handle.connection()?, sql)?;
            let column_count = stmt.column_count();
            let rows = stmt
                .query_map(params_from_iter(params), |row| read_row(row, column_count))?
                .collect::<rusqlite::Result<RowSet>>()?;
            debug!("Fetched {} rows", rows.len());
            Ok(rows)
        })
    }

    /// Executes an UPDATE and returns the number of rows it changed.
    pub fn update<P: AsRef<Path>>(&self, path: P, sql: &str, params: &[Value]) -> Result<usize> {
        self.write_counting(path, sql, params)
    }

    /// Executes a DELETE and returns the number of rows it removed.
    pub fn delete<P: AsRef<Path>>(&self, path: P, sql: &str, params: &[Value]) -> Result<usize> {
        self.write_counting(path, sql, params)
    }

    fn write_counting<P: AsRef<Path>>(&self, path: P, sql: &str, params: &[Value]) -> Result<usize> {
        self.write(path, sql, |tx| {
            let changed = prepare_single(tx, sql)?.execute(params_from_iter(params))?;
            debug!("{} rows affected", changed);
            Ok(changed)
        })
    }

    /// Opens a handle, runs `f` in one committed transaction, and closes the handle.
    fn write<P, T, F>(&self, path: P, sql: &str, f: F) -> Result<T>
    where
        P: AsRef<Path>,
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T>,
    {
        let mut handle = self.open(path)?;
        debug!(kind = ?StatementType::from_sql(sql), "Executing on {}", handle.path());
        let result = handle.transaction(f);
        handle.close();
        result
    }

    /// Opens a handle, runs `f` against it, and closes the handle.
    fn read<P, T, F>(&self, path: P, sql: &str, f: F) -> Result<T>
    where
        P: AsRef<Path>,
        F: FnOnce(&DatabaseHandle) -> Result<T>,
    {
        let mut handle = self.open(path)?;
        debug!(kind = ?StatementType::from_sql(sql), "Querying {}", handle.path());
        let result = f(&handle);
        handle.close();
        result
    }
}

/// Prepares the only statement in `sql`.
///
/// Trailing whitespace, semicolons and comments are allowed; a second statement
/// is rejected with `ExecError::Statement` rather than silently skipped.
fn prepare_single<'conn>(conn: &'conn Connection, sql: &str) -> Result<Statement<'conn>> {
    let mut batch = Batch::new(conn, sql);
    let stmt = match batch.next()? {
        Some(stmt) => stmt,
        None => {
            return Err(ExecError::Statement(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_MISUSE),
                Some("no statement to execute".to_string()),
            )))
        }
    };

    // a tail that fails to prepare is still a second statement
    match batch.next() {
        Ok(None) => Ok(stmt),
        _ => Err(ExecError::Statement(rusqlite::Error::MultipleStatement)),
    }
}

/// Copies every column of the current row out of the engine.
fn read_row(row: &rusqlite::Row<'_>, column_count: usize) -> rusqlite::Result<Row> {
    let mut values = Vec::with_capacity(column_count);
    for i in 0..column_count {
        values.push(Value::from(row.get_ref(i)?));
    }
    Ok(values)
}

/// Represents different SQL statement types, used to label executed statements
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatementType {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    /// BEGIN/COMMIT/ROLLBACK transaction commands
    Transaction,
    Other,
}

impl StatementType {
    /// Determines the statement type from the leading keyword of a SQL string
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| c.is_whitespace() || c == '(' || c == ';')
            .next()
            .unwrap_or("")
            .to_uppercase();

        match keyword.as_str() {
            "SELECT" | "WITH" | "VALUES" => StatementType::Select,
            "INSERT" | "REPLACE" => StatementType::Insert,
            "UPDATE" => StatementType::Update,
            "DELETE" => StatementType::Delete,
            "CREATE" => StatementType::Create,
            "DROP" => StatementType::Drop,
            "ALTER" => StatementType::Alter,
            "BEGIN" | "COMMIT" | "END" | "ROLLBACK" => StatementType::Transaction,
            _ => StatementType::Other,
        }
    }
}

/// Executes a DDL statement with the default configuration.
pub fn create_table<P: AsRef<Path>>(path: P, ddl: &str) -> Result<()> {
    StatementExecutor::new().create_table(path, ddl)
}

/// Inserts one row with the default configuration, returning its rowid.
pub fn insert_one<P: AsRef<Path>>(path: P, sql: &str, params: &[Value]) -> Result<i64> {
    StatementExecutor::new().insert_one(path, sql, params)
}

/// Inserts a batch of rows with the default configuration, returning the last rowid.
pub fn insert_many<P: AsRef<Path>>(path: P, sql: &str, rows: &[Row]) -> Result<Option<i64>> {
    StatementExecutor::new().insert_many(path, sql, rows)
}

/// Fetches at most one row with the default configuration.
pub fn select_one<P: AsRef<Path>>(path: P, sql: &str, params: &[Value]) -> Result<Option<Row>> {
    StatementExecutor::new().select_one(path, sql, params)
}

/// Fetches all matching rows with the default configuration.
pub fn select_many<P: AsRef<Path>>(path: P, sql: &str, params: &[Value]) -> Result<RowSet> {
    StatementExecutor::new().select_many(path, sql, params)
}

/// Executes an UPDATE with the default configuration, returning the affected row count.
pub fn update<P: AsRef<Path>>(path: P, sql: &str, params: &[Value]) -> Result<usize> {
    StatementExecutor::new().update(path, sql, params)
}

/// Executes a DELETE with the default configuration, returning the removed row count.
pub fn delete<P: AsRef<Path>>(path: P, sql: &str, params: &[Value]) -> Result<usize> {
    StatementExecutor::new().delete(path, sql, params)
}
