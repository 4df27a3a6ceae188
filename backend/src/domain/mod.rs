//! Domain primitives, ports and services.
//!
//! Purpose: define the todo entity, the error taxonomy shared by every
//! adapter, and the business rules applied before persistence. Nothing in
//! here knows about gRPC or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure classes.
//! - Todo, TodoId, NewTodo, TodoChanges: the todo record and its inputs.
//! - TodoService: implements the driving ports over a repository.
//! - TraceId: per-call correlation identifier.

pub mod error;
pub mod ports;
pub mod todo;
pub mod todo_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::todo::{NewTodo, Todo, TodoChanges, TodoDraft, TodoId, TodoValidationError};
pub use self::todo_service::{NOT_FOUND_MESSAGE, TodoService};
pub use self::trace_id::TraceId;
