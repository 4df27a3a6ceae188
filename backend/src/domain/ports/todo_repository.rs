//! Port for todo persistence.

use async_trait::async_trait;

use crate::domain::{NewTodo, Todo, TodoChanges, TodoId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by todo repository adapters.
    pub enum TodoRepositoryError {
        /// No row matched the identifier.
        NotFound { id: TodoId } => "todo {id} not found",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "todo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "todo repository query failed: {message}",
    }
}

/// Port for reading and writing todo records.
///
/// Adapters assign identifiers and timestamps; every method returns the record
/// exactly as stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Insert a new record with a fresh id, `completed = false` and both
    /// timestamps taken from a single clock reading.
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoRepositoryError>;

    /// Fetch one record.
    async fn find_by_id(&self, id: &TodoId) -> Result<Todo, TodoRepositoryError>;

    /// All records, newest first.
    async fn list(&self) -> Result<Vec<Todo>, TodoRepositoryError>;

    /// Overwrite the mutable fields and refresh `updated_at`.
    async fn update(
        &self,
        id: &TodoId,
        changes: &TodoChanges,
    ) -> Result<Todo, TodoRepositoryError>;

    /// Hard-delete one record.
    async fn delete(&self, id: &TodoId) -> Result<(), TodoRepositoryError>;
}
