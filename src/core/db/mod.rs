/// Database Module
///
/// ## Architecture
///
/// The database layer is split into two concerns:
/// - **Connection Management** (`connection.rs`): opening, configuring and closing one handle
/// - **Query Execution** (`query.rs`): the per-call operations built on top of a handle
///
/// ## Error Handling
///
/// Every operation propagates the typed `ExecError`; nothing is logged and swallowed.
pub mod connection;
pub mod query;

pub use connection::*;
pub use query::*;
