//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod todo_command;
mod todo_query;
mod todo_repository;

#[cfg(test)]
pub use todo_command::MockTodoCommand;
pub use todo_command::{CreateTodoRequest, DeleteTodoRequest, TodoCommand, UpdateTodoRequest};
#[cfg(test)]
pub use todo_query::MockTodoQuery;
pub use todo_query::{GetTodoRequest, TodoQuery};
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
pub use todo_repository::{TodoRepository, TodoRepositoryError};
