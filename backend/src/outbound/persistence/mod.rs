//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types. No business rules live here.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leak to the domain.
//! - **Async-safe pooling**: connections come from a `bb8` pool through
//!   `diesel-async`.
//! - **Strongly typed errors**: Diesel and pool failures map onto
//!   `TodoRepositoryError`.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_backend::outbound::persistence::{DbPool, DieselTodoRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), todo_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/todos")).await?;
//! let repo = DieselTodoRepository::new(pool, Arc::new(mockable::DefaultClock));
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_todo_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_todo_repository::DieselTodoRepository;
pub use migrations::{MIGRATIONS, MigrationError, apply_migrations, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
