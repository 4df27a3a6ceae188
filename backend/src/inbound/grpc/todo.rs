//! `todo.v1.TodoService` handler.
//!
//! Extracts request fields, calls the driving ports and maps records onto
//! wire messages. Failures become statuses through `From<Error> for Status`.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::domain::Todo;
use crate::domain::ports::{self, TodoCommand, TodoQuery};

use super::pb;
use super::pb::todo_service_server::TodoService;
use super::trace::traced;

impl From<Todo> for pb::Todo {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id().to_string(),
            title: todo.title().to_owned(),
            description: todo.description().to_owned(),
            completed: todo.completed(),
            created_at: todo.created_at().timestamp(),
            updated_at: todo.updated_at().timestamp(),
        }
    }
}

/// gRPC handler holding only the driving ports.
#[derive(Clone)]
pub struct TodoGrpcHandler {
    command: Arc<dyn TodoCommand>,
    query: Arc<dyn TodoQuery>,
}

impl TodoGrpcHandler {
    /// Create a handler over the command and query ports.
    pub fn new(command: Arc<dyn TodoCommand>, query: Arc<dyn TodoQuery>) -> Self {
        Self { command, query }
    }
}

#[tonic::async_trait]
impl TodoService for TodoGrpcHandler {
    async fn create_todo(
        &self,
        request: Request<pb::CreateTodoRequest>,
    ) -> Result<Response<pb::CreateTodoResponse>, Status> {
        let pb::CreateTodoRequest { title, description } = request.into_inner();
        traced(async move {
            let todo = self
                .command
                .create_todo(ports::CreateTodoRequest { title, description })
                .await?;
            Ok(Response::new(pb::CreateTodoResponse {
                todo: Some(todo.into()),
            }))
        })
        .await
    }

    async fn get_todo(
        &self,
        request: Request<pb::GetTodoRequest>,
    ) -> Result<Response<pb::Todo>, Status> {
        let pb::GetTodoRequest { id } = request.into_inner();
        traced(async move {
            let todo = self.query.get_todo(ports::GetTodoRequest { id }).await?;
            Ok(Response::new(todo.into()))
        })
        .await
    }

    async fn list_todos(
        &self,
        _request: Request<pb::ListTodosRequest>,
    ) -> Result<Response<pb::ListTodosResponse>, Status> {
        traced(async move {
            let todos = self.query.list_todos().await?;
            Ok(Response::new(pb::ListTodosResponse {
                todos: todos.into_iter().map(Into::into).collect(),
            }))
        })
        .await
    }

    async fn update_todo(
        &self,
        request: Request<pb::UpdateTodoRequest>,
    ) -> Result<Response<pb::Todo>, Status> {
        let pb::UpdateTodoRequest {
            id,
            title,
            description,
            completed,
        } = request.into_inner();
        traced(async move {
            let todo = self
                .command
                .update_todo(ports::UpdateTodoRequest {
                    id,
                    title,
                    description,
                    completed,
                })
                .await?;
            Ok(Response::new(todo.into()))
        })
        .await
    }

    async fn delete_todo(
        &self,
        request: Request<pb::DeleteTodoRequest>,
    ) -> Result<Response<pb::DeleteTodoResponse>, Status> {
        let pb::DeleteTodoRequest { id } = request.into_inner();
        traced(async move {
            self.command
                .delete_todo(ports::DeleteTodoRequest { id })
                .await?;
            Ok(Response::new(pb::DeleteTodoResponse {}))
        })
        .await
    }
}

#[cfg(test)]
#[path = "todo_tests.rs"]
mod tests;
