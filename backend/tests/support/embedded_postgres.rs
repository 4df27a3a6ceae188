//! Database provisioning against an embedded cluster.
//!
//! Resets go through the plain `postgres` client on the `postgres`
//! maintenance database so `DROP DATABASE` runs outside any transaction.

use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use todo_backend::outbound::persistence::run_pending_migrations;

use super::format_postgres_error;

/// Drop and recreate `name`, leaving an empty database behind.
pub fn reset_database(cluster: &TestCluster, name: &str) -> Result<(), String> {
    let admin_url = cluster.connection().database_url("postgres");
    let mut client = Client::connect(&admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    // One statement per call: a multi-statement batch is an implicit
    // transaction, which DROP DATABASE refuses.
    for statement in [
        format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"),
        format!("CREATE DATABASE \"{name}\""),
    ] {
        client
            .batch_execute(&statement)
            .map_err(|err| format_postgres_error(&err))?;
    }
    Ok(())
}

/// Run a one-off statement against `url`.
pub fn execute_sql(url: &str, statement: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(statement)
        .map_err(|err| format_postgres_error(&err))
}

/// Apply the service's embedded migrations to `url`.
pub fn migrate_schema(url: &str) -> Result<Vec<String>, String> {
    run_pending_migrations(url).map_err(|err| err.to_string())
}
