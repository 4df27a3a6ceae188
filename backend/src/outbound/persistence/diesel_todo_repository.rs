//! PostgreSQL-backed `TodoRepository` implementation using Diesel ORM.
//!
//! Every operation is a single statement. Writes use `RETURNING` so callers
//! receive the row exactly as stored, including timestamp truncation to
//! PostgreSQL's microsecond precision.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Timestamptz;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{TodoRepository, TodoRepositoryError};
use crate::domain::{NewTodo, Todo, TodoChanges, TodoDraft, TodoId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTodoRow, TodoRow, TodoUpdate};
use super::pool::DbPool;
use super::schema::todos;

diesel::define_sql_function! {
    /// PostgreSQL `GREATEST` over two timestamps.
    fn greatest(a: Timestamptz, b: Timestamptz) -> Timestamptz;
}

/// Diesel-backed implementation of the `TodoRepository` port.
///
/// Identifiers come from UUID v4 and timestamps from the injected clock, so
/// tests can pin both without touching the database defaults.
#[derive(Clone)]
pub struct DieselTodoRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselTodoRepository {
    /// Create a new repository with the given connection pool and clock.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

/// Convert a database row to a domain todo.
fn row_to_todo(row: TodoRow) -> Result<Todo, TodoRepositoryError> {
    let id = row.id;
    Todo::new(TodoDraft {
        id: TodoId::from_uuid(row.id),
        title: row.title,
        description: row.description,
        completed: row.completed,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
    .map_err(|err| {
        warn!(todo_id = %id, error = %err, "stored todo violates record invariants");
        TodoRepositoryError::query(format!("stored todo is invalid: {err}"))
    })
}

#[async_trait]
impl TodoRepository for DieselTodoRepository {
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let now = self.clock.utc();
        let new_row = NewTodoRow {
            id: *TodoId::random().as_uuid(),
            title: &todo.title,
            description: &todo.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let row: TodoRow = diesel::insert_into(todos::table)
            .values(&new_row)
            .returning(TodoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_todo(row)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Todo, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TodoRow> = todos::table
            .find(*id.as_uuid())
            .select(TodoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_todo)
            .unwrap_or_else(|| Err(TodoRepositoryError::not_found(*id)))
    }

    async fn list(&self) -> Result<Vec<Todo>, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TodoRow> = todos::table
            .order((todos::created_at.desc(), todos::id.desc()))
            .select(TodoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_todo).collect()
    }

    async fn update(
        &self,
        id: &TodoId,
        changes: &TodoChanges,
    ) -> Result<Todo, TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = TodoUpdate {
            title: &changes.title,
            description: &changes.description,
            completed: changes.completed,
        };
        // A clock that stepped back must not push updated_at below created_at.
        let updated_at = greatest(todos::created_at, self.clock.utc());

        let row: Option<TodoRow> = diesel::update(todos::table.find(*id.as_uuid()))
            .set((&update, todos::updated_at.eq(updated_at)))
            .returning(TodoRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_todo)
            .unwrap_or_else(|| Err(TodoRepositoryError::not_found(*id)))
    }

    async fn delete(&self, id: &TodoId) -> Result<(), TodoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(todos::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if deleted == 0 {
            return Err(TodoRepositoryError::not_found(*id));
        }
        Ok(())
    }
}
