//! Single-statement-per-call helpers over an embedded SQLite database.
//!
//! Each operation opens its own handle on the database file, executes one
//! parameterized statement, commits (for writes), and closes the handle before
//! returning, whether it succeeded or not.
//!
//! ```no_run
//! use sqlite_exec::row;
//!
//! let db = "sqlite.db";
//! sqlite_exec::create_table(db, "CREATE TABLE IF NOT EXISTS test (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INTEGER)")?;
//! let id = sqlite_exec::insert_one(db, "INSERT INTO test (name, age) VALUES (?, ?)", &row!["John", 20])?;
//! let row = sqlite_exec::select_one(db, "SELECT * FROM test WHERE id = ?", &row![id])?;
//! assert!(row.is_some());
//! # Ok::<(), sqlite_exec::ExecError>(())
//! ```

// Core infrastructure modules
pub mod config;
pub mod core;

pub use crate::config::{load_config, Config, SqliteConfig};
pub use crate::core::db::{
    close, create_table, delete, insert_many, insert_one, open, select_many, select_one, update,
    DatabaseHandle, StatementExecutor, StatementType,
};
pub use crate::core::{ExecError, Result, Row, RowSet, Value};
