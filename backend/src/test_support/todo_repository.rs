//! In-memory `TodoRepository` for tests that do not need PostgreSQL.
//!
//! Mirrors the Diesel adapter's observable behaviour: fresh UUID v4 ids, one
//! clock reading per write (updates never fall below `created_at`), newest-first
//! listing with id as tie-breaker.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{TodoRepository, TodoRepositoryError};
use crate::domain::{NewTodo, Todo, TodoChanges, TodoDraft, TodoId};

#[derive(Default)]
struct State {
    todos: HashMap<TodoId, Todo>,
    next_failure: Option<TodoRepositoryError>,
}

/// Thread-safe in-memory todo store.
pub struct InMemoryTodoRepository {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTodoRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    /// Make the next call fail with `error`, whatever the operation.
    pub fn fail_next_with(&self, error: TodoRepositoryError) {
        self.lock_state().next_failure = Some(error);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock_state().todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self) -> Result<MutexGuard<'_, State>, TodoRepositoryError> {
        let mut state = self.lock_state();
        match state.next_failure.take() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

fn build(draft: TodoDraft) -> Result<Todo, TodoRepositoryError> {
    Todo::new(draft).map_err(|err| TodoRepositoryError::query(err.to_string()))
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: &NewTodo) -> Result<Todo, TodoRepositoryError> {
        let mut state = self.begin()?;
        let now = self.clock.utc();
        let created = build(TodoDraft {
            id: TodoId::random(),
            title: todo.title.clone(),
            description: todo.description.clone(),
            completed: false,
            created_at: now,
            updated_at: now,
        })?;
        state.todos.insert(created.id(), created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Todo, TodoRepositoryError> {
        let state = self.begin()?;
        state
            .todos
            .get(id)
            .cloned()
            .ok_or_else(|| TodoRepositoryError::not_found(*id))
    }

    async fn list(&self) -> Result<Vec<Todo>, TodoRepositoryError> {
        let state = self.begin()?;
        let mut todos: Vec<Todo> = state.todos.values().cloned().collect();
        todos.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(todos)
    }

    async fn update(
        &self,
        id: &TodoId,
        changes: &TodoChanges,
    ) -> Result<Todo, TodoRepositoryError> {
        let mut state = self.begin()?;
        let existing = state
            .todos
            .get(id)
            .ok_or_else(|| TodoRepositoryError::not_found(*id))?;
        let updated = build(TodoDraft {
            id: *id,
            title: changes.title.clone(),
            description: changes.description.clone(),
            completed: changes.completed,
            created_at: existing.created_at(),
            updated_at: self.clock.utc().max(existing.created_at()),
        })?;
        state.todos.insert(*id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &TodoId) -> Result<(), TodoRepositoryError> {
        let mut state = self.begin()?;
        state
            .todos
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TodoRepositoryError::not_found(*id))
    }
}
