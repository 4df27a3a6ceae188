//! Integration tests for `DieselTodoRepository` against embedded PostgreSQL.

use std::sync::Arc;

use mockable::Clock;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use tonic::{Code, Status};

use todo_backend::domain::ports::{TodoQuery, TodoRepository, TodoRepositoryError};
use todo_backend::domain::{NewTodo, TodoChanges, TodoId, TodoService};
use todo_backend::outbound::persistence::{
    DbPool, DieselTodoRepository, PoolConfig, run_pending_migrations,
};
use todo_backend::test_support::MutableClock;

mod support;

use support::{
    execute_sql, handle_cluster_setup_failure, migrate_schema, reset_database, test_cluster,
};

const TEST_DB: &str = "diesel_todo_repo_test";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    database_url: String,
    pool: DbPool,
    clock: Arc<MutableClock>,
    repository: DieselTodoRepository,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    reset_database(&cluster, TEST_DB)?;
    let database_url = cluster.connection().database_url(TEST_DB);
    migrate_schema(&database_url)?;

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    let clock = Arc::new(MutableClock::fixed());
    let repository = DieselTodoRepository::new(pool.clone(), clock.clone());

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        database_url,
        pool,
        clock,
        repository,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn new_todo(title: &str) -> NewTodo {
    NewTodo {
        title: title.to_owned(),
        description: format!("{title} notes"),
    }
}

#[rstest]
fn create_then_find_round_trip(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: create_then_find_round_trip skipped");
        return;
    };
    let repository = &context.repository;

    let created = context
        .runtime
        .block_on(repository.create(&new_todo("groceries")))
        .expect("create todo");
    let found = context
        .runtime
        .block_on(repository.find_by_id(&created.id()))
        .expect("find todo");

    assert_eq!(found, created);
    assert_eq!(found.title(), "groceries");
    assert_eq!(found.description(), "groceries notes");
    assert!(!found.completed());
    assert_eq!(found.created_at(), context.clock.utc());
    assert_eq!(found.created_at(), found.updated_at());
}

#[rstest]
fn list_is_newest_first(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: list_is_newest_first skipped");
        return;
    };
    let repository = &context.repository;

    for title in ["first", "second", "third"] {
        context
            .runtime
            .block_on(repository.create(&new_todo(title)))
            .expect("create todo");
        context.clock.advance_seconds(1);
    }

    let listed = context
        .runtime
        .block_on(repository.list())
        .expect("list todos");
    let titles: Vec<&str> = listed.iter().map(|todo| todo.title()).collect();

    assert_eq!(titles, ["third", "second", "first"]);
}

#[rstest]
fn empty_store_lists_nothing(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: empty_store_lists_nothing skipped");
        return;
    };

    let listed = context
        .runtime
        .block_on(context.repository.list())
        .expect("list todos");

    assert!(listed.is_empty());
}

#[rstest]
fn update_replaces_fields_and_keeps_creation_time(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: update_replaces_fields_and_keeps_creation_time skipped");
        return;
    };
    let repository = &context.repository;
    let created = context
        .runtime
        .block_on(repository.create(&new_todo("draft")))
        .expect("create todo");
    context.clock.advance_seconds(30);

    let changes = TodoChanges {
        title: "final".to_owned(),
        description: String::new(),
        completed: true,
    };
    let updated = context
        .runtime
        .block_on(repository.update(&created.id(), &changes))
        .expect("update todo");

    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.title(), "final");
    assert_eq!(updated.description(), "");
    assert!(updated.completed());
    assert_eq!(updated.created_at(), created.created_at());
    assert_eq!(updated.updated_at(), context.clock.utc());

    let stored = context
        .runtime
        .block_on(repository.find_by_id(&created.id()))
        .expect("find todo");
    assert_eq!(stored, updated);
}

#[rstest]
fn update_after_clock_regression_keeps_updated_at_at_creation(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: update_after_clock_regression_keeps_updated_at_at_creation skipped");
        return;
    };
    let repository = &context.repository;
    let created = context
        .runtime
        .block_on(repository.create(&new_todo("skewed")))
        .expect("create todo");
    context.clock.advance_seconds(-5);

    let changes = TodoChanges {
        title: "skewed".to_owned(),
        description: String::new(),
        completed: true,
    };
    let updated = context
        .runtime
        .block_on(repository.update(&created.id(), &changes))
        .expect("update succeeds despite the clock stepping back");

    assert!(updated.completed());
    assert_eq!(updated.updated_at(), created.created_at());

    let listed = context
        .runtime
        .block_on(repository.list())
        .expect("stored row stays readable");
    assert_eq!(listed, vec![updated]);
}

#[rstest]
fn delete_removes_the_record(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: delete_removes_the_record skipped");
        return;
    };
    let repository = &context.repository;
    let created = context
        .runtime
        .block_on(repository.create(&new_todo("laundry")))
        .expect("create todo");

    context
        .runtime
        .block_on(repository.delete(&created.id()))
        .expect("delete todo");

    let error = context
        .runtime
        .block_on(repository.find_by_id(&created.id()))
        .expect_err("deleted todo is gone");
    assert_eq!(error, TodoRepositoryError::not_found(created.id()));
}

#[rstest]
fn missing_ids_are_not_found(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: missing_ids_are_not_found skipped");
        return;
    };
    let repository = &context.repository;
    let id = TodoId::random();
    let changes = TodoChanges {
        title: "ghost".to_owned(),
        description: String::new(),
        completed: false,
    };

    let expected = TodoRepositoryError::not_found(id);
    let runtime = &context.runtime;
    assert_eq!(runtime.block_on(repository.find_by_id(&id)), Err(expected.clone()));
    assert_eq!(
        runtime.block_on(repository.update(&id, &changes)).map(|_| ()),
        Err(expected.clone())
    );
    assert_eq!(runtime.block_on(repository.delete(&id)), Err(expected));
}

#[rstest]
fn blank_title_violates_the_check_constraint(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: blank_title_violates_the_check_constraint skipped");
        return;
    };

    let error = context
        .runtime
        .block_on(context.repository.create(&new_todo("")))
        .expect_err("check constraint rejects blank titles");

    assert!(matches!(error, TodoRepositoryError::Query { .. }));
    assert!(error.to_string().contains("violates check constraint"), "{error}");
    assert!(
        context
            .runtime
            .block_on(context.repository.list())
            .expect("list todos")
            .is_empty()
    );
}

#[rstest]
fn database_cause_reaches_the_internal_status(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: database_cause_reaches_the_internal_status skipped");
        return;
    };
    execute_sql(&context.database_url, "DROP TABLE todos").expect("drop todos table");
    let service = TodoService::new(Arc::new(DieselTodoRepository::new(
        context.pool.clone(),
        context.clock.clone(),
    )));

    let error = context
        .runtime
        .block_on(service.list_todos())
        .expect_err("listing a dropped table fails");
    let status = Status::from(error);

    assert_eq!(status.code(), Code::Internal);
    assert!(status.message().starts_with("internal error: "));
    assert!(
        status.message().contains("relation \"todos\" does not exist"),
        "cause missing from {:?}",
        status.message()
    );
}

#[rstest]
fn migrations_apply_once(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: migrations_apply_once skipped");
        return;
    };

    let reapplied = run_pending_migrations(&context.database_url).expect("rerun migrations");

    assert!(reapplied.is_empty());
}

#[rstest]
fn pool_answers_ping(repo_context: Option<TestContext>) {
    let Some(context) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: pool_answers_ping skipped");
        return;
    };

    context
        .runtime
        .block_on(context.pool.ping())
        .expect("ping succeeds");
}
