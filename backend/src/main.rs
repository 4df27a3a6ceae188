//! Backend entry-point: loads settings, prepares the database and serves gRPC
//! until SIGINT or SIGTERM.

use std::sync::Arc;

use color_eyre::eyre::{Context, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use todo_backend::domain::TodoService;
use todo_backend::outbound::persistence::{DbPool, DieselTodoRepository, apply_migrations};
use todo_backend::server::{TodoServer, shutdown_signal};
use todo_backend::settings::TodoSettings;

/// Application bootstrap.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        TodoSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let pool_config = settings.pool_config()?;
    let server_config = settings.server_config()?;

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to create database pool")?;
    pool.ping().await.wrap_err("database unreachable")?;
    apply_migrations(settings.database_url()?)
        .await
        .wrap_err("failed to migrate database")?;

    let repository = Arc::new(DieselTodoRepository::new(pool, Arc::new(DefaultClock)));
    let service = Arc::new(TodoService::new(repository));

    let bound = TodoServer::new(server_config, service.clone(), service)
        .bind()
        .await?;
    info!(addr = %bound.local_addr(), "starting todo service");

    bound.serve_until(shutdown_signal()).await?;
    Ok(())
}
