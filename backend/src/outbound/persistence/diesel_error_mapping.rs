//! Diesel and pool error mapping for the todo repository.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::TodoRepositoryError;

use super::pool::PoolError;

/// Pool failures always mean the database could not be reached.
pub(super) fn map_pool_error(error: PoolError) -> TodoRepositoryError {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Ping { message } => TodoRepositoryError::connection(message),
    }
}

/// Map Diesel errors onto connection or query failures.
///
/// The driver's message is kept in the port error so it reaches the caller's
/// `INTERNAL` status. `NotFound` is handled by callers, which know the
/// identifier; reaching this function with it means a query unexpectedly
/// returned no row.
pub(super) fn map_diesel_error(error: DieselError) -> TodoRepositoryError {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            let cause = info.message();
            match kind {
                DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand => {
                    TodoRepositoryError::connection(format!("database connection error: {cause}"))
                }
                DatabaseErrorKind::CheckViolation => {
                    TodoRepositoryError::query(format!("check constraint violated: {cause}"))
                }
                DatabaseErrorKind::UniqueViolation => {
                    TodoRepositoryError::query(format!("duplicate todo id: {cause}"))
                }
                other => TodoRepositoryError::query(format!("database error ({other:?}): {cause}")),
            }
        }
        DieselError::NotFound => TodoRepositoryError::query("record not found"),
        other => {
            debug!(error = %other, "diesel operation failed");
            TodoRepositoryError::query(format!("database error: {other}"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PoolError::checkout("connection refused"))]
    #[case(PoolError::build("bad url"))]
    #[case(PoolError::ping("no reply"))]
    fn pool_errors_map_to_connection(#[case] error: PoolError) {
        assert!(matches!(
            map_pool_error(error),
            TodoRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn stray_not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(DieselError::NotFound);

        assert!(matches!(repo_err, TodoRepositoryError::Query { .. }));
        assert!(repo_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let repo_err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));

        assert!(matches!(repo_err, TodoRepositoryError::Connection { .. }));
    }

    #[rstest]
    fn check_violation_maps_to_query_error() {
        let repo_err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation,
            Box::new("todos_title_check".to_owned()),
        ));

        assert_eq!(
            repo_err,
            TodoRepositoryError::query("check constraint violated: todos_title_check")
        );
    }

    #[rstest]
    fn unknown_database_errors_keep_the_driver_message() {
        let repo_err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("relation \"todos\" does not exist".to_owned()),
        ));

        assert!(matches!(repo_err, TodoRepositoryError::Query { .. }));
        assert!(
            repo_err
                .to_string()
                .contains("relation \"todos\" does not exist"),
            "cause missing from {repo_err}"
        );
    }

    #[rstest]
    fn non_database_errors_keep_their_display() {
        let repo_err = map_diesel_error(DieselError::QueryBuilderError("empty changeset".into()));

        assert!(repo_err.to_string().contains("empty changeset"));
    }
}
