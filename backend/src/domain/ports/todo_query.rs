//! Driving port for todo reads.

use async_trait::async_trait;

use crate::domain::{Error, Todo};

/// Request to fetch one todo by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTodoRequest {
    pub id: String,
}

/// Driving port for todo read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoQuery: Send + Sync {
    /// Fetch one todo.
    ///
    /// An empty id is an invalid request; an id that was never issued is
    /// reported as not found.
    async fn get_todo(&self, request: GetTodoRequest) -> Result<Todo, Error>;

    /// All todos, newest first.
    async fn list_todos(&self) -> Result<Vec<Todo>, Error>;
}
