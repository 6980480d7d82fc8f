/// Core Module
///
/// Shared infrastructure for statement execution: the error taxonomy, the
/// dynamically shaped row values, and the database layer itself.

pub mod db;
pub mod error;
pub mod value;

// Re-export commonly used types for convenience
pub use error::{ExecError, Result};
pub use value::{Row, RowSet, Value};
