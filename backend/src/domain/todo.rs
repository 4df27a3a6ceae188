//! Todo data model.
//!
//! A [`Todo`] is the sole persisted entity. Records are immutable values: the
//! persistence adapter owns the stored representation and hands out copies.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Validation errors raised while building todo values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyId,
    InvalidId,
    EmptyTitle,
    UpdatedBeforeCreated,
}

impl fmt::Display for TodoValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "id is required"),
            Self::InvalidId => write!(f, "todo id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title is required"),
            Self::UpdatedBeforeCreated => {
                write!(f, "updated_at must not precede created_at")
            }
        }
    }
}

impl std::error::Error for TodoValidationError {}

/// Server-assigned todo identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Parse an identifier received from a client.
    ///
    /// # Examples
    /// ```
    /// use todo_backend::domain::{TodoId, TodoValidationError};
    ///
    /// assert_eq!(TodoId::parse(""), Err(TodoValidationError::EmptyId));
    /// assert_eq!(TodoId::parse("nope"), Err(TodoValidationError::InvalidId));
    /// assert!(TodoId::parse("6f1c1a4e-8d0b-4a53-9a8e-1f0d2b3c4d5e").is_ok());
    /// ```
    pub fn parse(id: impl AsRef<str>) -> Result<Self, TodoValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(TodoValidationError::EmptyId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| TodoValidationError::InvalidId)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-validated UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Input for creating a todo. The title has been validated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
}

/// Full replacement of the mutable todo fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Raw field set used to assemble a [`Todo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted todo item.
///
/// ## Invariants
/// - `title` is non-empty.
/// - `created_at <= updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Build a todo from its raw fields, enforcing the record invariants.
    pub fn new(draft: TodoDraft) -> Result<Self, TodoValidationError> {
        if draft.title.is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        if draft.updated_at < draft.created_at {
            return Err(TodoValidationError::UpdatedBeforeCreated);
        }
        Ok(Self {
            id: draft.id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
        })
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn draft() -> TodoDraft {
        let now = Utc
            .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        TodoDraft {
            id: TodoId::random(),
            title: "buy milk".to_owned(),
            description: String::new(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    fn accepts_valid_draft(draft: TodoDraft) {
        let todo = Todo::new(draft.clone()).expect("valid todo");
        assert_eq!(todo.id(), draft.id);
        assert_eq!(todo.title(), "buy milk");
        assert!(!todo.completed());
    }

    #[rstest]
    fn rejects_empty_title(mut draft: TodoDraft) {
        draft.title.clear();
        assert_eq!(Todo::new(draft), Err(TodoValidationError::EmptyTitle));
    }

    #[rstest]
    fn rejects_updated_before_created(mut draft: TodoDraft) {
        draft.updated_at = draft.created_at - Duration::seconds(1);
        assert_eq!(
            Todo::new(draft),
            Err(TodoValidationError::UpdatedBeforeCreated)
        );
    }

    #[rstest]
    #[case("", TodoValidationError::EmptyId)]
    #[case("not-a-uuid", TodoValidationError::InvalidId)]
    #[case(" 6f1c1a4e-8d0b-4a53-9a8e-1f0d2b3c4d5e", TodoValidationError::InvalidId)]
    fn parse_rejects_bad_ids(#[case] raw: &str, #[case] expected: TodoValidationError) {
        assert_eq!(TodoId::parse(raw), Err(expected));
    }

    #[rstest]
    fn parse_round_trips_display() {
        let id = TodoId::random();
        assert_eq!(TodoId::parse(id.to_string()), Ok(id));
    }
}
