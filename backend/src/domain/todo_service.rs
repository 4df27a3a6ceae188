//! Todo business rules.
//!
//! [`TodoService`] implements both driving ports over a [`TodoRepository`].
//! It checks required fields before touching storage and folds repository
//! failures into the domain error taxonomy.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    CreateTodoRequest, DeleteTodoRequest, GetTodoRequest, TodoCommand, TodoQuery, TodoRepository,
    TodoRepositoryError, UpdateTodoRequest,
};
use crate::domain::{Error, NewTodo, Todo, TodoChanges, TodoId, TodoValidationError};

/// Message carried by every not-found failure.
pub const NOT_FOUND_MESSAGE: &str = "todo not found";

fn map_repository_error(error: TodoRepositoryError) -> Error {
    match error {
        TodoRepositoryError::NotFound { .. } => Error::not_found(NOT_FOUND_MESSAGE),
        TodoRepositoryError::Connection { .. } | TodoRepositoryError::Query { .. } => {
            Error::internal(error.to_string())
        }
    }
}

/// Resolve a client-supplied id.
///
/// A malformed id cannot name a stored record, so it reads as not found.
fn parse_id(raw: &str) -> Result<TodoId, Error> {
    TodoId::parse(raw).map_err(|err| match err {
        TodoValidationError::EmptyId => Error::invalid_request(err.to_string()),
        _ => Error::not_found(NOT_FOUND_MESSAGE),
    })
}

fn require_title(title: &str) -> Result<(), Error> {
    if title.is_empty() {
        return Err(Error::invalid_request(
            TodoValidationError::EmptyTitle.to_string(),
        ));
    }
    Ok(())
}

/// Todo service implementing the command and query driving ports.
#[derive(Clone)]
pub struct TodoService<R> {
    todo_repo: Arc<R>,
}

impl<R> TodoService<R> {
    /// Create a new service over the todo repository.
    pub fn new(todo_repo: Arc<R>) -> Self {
        Self { todo_repo }
    }
}

#[async_trait]
impl<R> TodoCommand for TodoService<R>
where
    R: TodoRepository,
{
    async fn create_todo(&self, request: CreateTodoRequest) -> Result<Todo, Error> {
        require_title(&request.title)?;

        let todo = NewTodo {
            title: request.title,
            description: request.description,
        };
        self.todo_repo
            .create(&todo)
            .await
            .map_err(map_repository_error)
    }

    async fn update_todo(&self, request: UpdateTodoRequest) -> Result<Todo, Error> {
        let id = parse_id(&request.id)?;
        require_title(&request.title)?;

        let changes = TodoChanges {
            title: request.title,
            description: request.description,
            completed: request.completed,
        };
        self.todo_repo
            .update(&id, &changes)
            .await
            .map_err(map_repository_error)
    }

    async fn delete_todo(&self, request: DeleteTodoRequest) -> Result<(), Error> {
        let id = parse_id(&request.id)?;
        self.todo_repo
            .delete(&id)
            .await
            .map_err(map_repository_error)
    }
}

#[async_trait]
impl<R> TodoQuery for TodoService<R>
where
    R: TodoRepository,
{
    async fn get_todo(&self, request: GetTodoRequest) -> Result<Todo, Error> {
        let id = parse_id(&request.id)?;
        self.todo_repo
            .find_by_id(&id)
            .await
            .map_err(map_repository_error)
    }

    async fn list_todos(&self) -> Result<Vec<Todo>, Error> {
        self.todo_repo.list().await.map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "todo_service_tests.rs"]
mod tests;
