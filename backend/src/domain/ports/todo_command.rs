//! Driving port for todo mutations.
//!
//! Inbound adapters hand over raw client input; validation happens behind the
//! port so every transport gets the same rules.

use async_trait::async_trait;

use crate::domain::{Error, Todo};

/// Request to create a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: String,
}

/// Request to replace the mutable fields of a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTodoRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Request to delete a todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTodoRequest {
    pub id: String,
}

/// Driving port for todo write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoCommand: Send + Sync {
    /// Create a todo and return the stored record.
    ///
    /// Fails with [`crate::domain::ErrorCode::InvalidRequest`] when the title
    /// is empty.
    async fn create_todo(&self, request: CreateTodoRequest) -> Result<Todo, Error>;

    /// Update a todo and return the stored record.
    async fn update_todo(&self, request: UpdateTodoRequest) -> Result<Todo, Error>;

    /// Delete a todo.
    async fn delete_todo(&self, request: DeleteTodoRequest) -> Result<(), Error>;
}
