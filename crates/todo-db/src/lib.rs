//! SQLite-backed todo repository: integer ids, one statement per operation.

pub mod repository;
pub mod types;

pub use repository::{RepositoryError, RepositoryResult, SqliteTodoRepository, TodoRepository};
pub use types::{TodoQuery, TodoRecord, DEFAULT_LIMIT, MAX_LIMIT};
