//! Service configuration loaded via OrthoConfig.
//!
//! Values merge from defaults, an optional config file, `TODO_*` environment
//! variables and CLI flags. Accessors apply defaults so callers never see a
//! missing optional value.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;
use crate::server::{DEFAULT_SHUTDOWN_GRACE, ServerConfig};

const DEFAULT_GRPC_ADDR: &str = "0.0.0.0:50051";
const DEFAULT_DB_MIN_IDLE: u32 = 4;
const DEFAULT_DB_IDLE_TIMEOUT_SECS: u64 = 300;

/// Errors raised when settings cannot be turned into runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was supplied.
    #[error("database_url is required (set TODO_DATABASE_URL)")]
    MissingDatabaseUrl,
    /// The gRPC bind address did not parse.
    #[error("invalid grpc_addr {value:?}: {message}")]
    InvalidBindAddress { value: String, message: String },
}

/// Configuration values for the todo service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TODO")]
pub struct TodoSettings {
    /// Address the gRPC listener binds.
    pub grpc_addr: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    #[ortho_config(default = 8)]
    pub db_max_connections: u32,
    /// Connections kept open while idle.
    pub db_min_idle: Option<u32>,
    /// Seconds before an idle pooled connection is closed.
    pub db_idle_timeout_secs: Option<u64>,
    /// Seconds in-flight calls get to finish after a shutdown signal.
    pub shutdown_grace_secs: Option<u64>,
    /// Optional server-wide per-call timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

impl TodoSettings {
    /// Return the configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddress`] when the value does not
    /// parse as a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.grpc_addr.as_deref().unwrap_or(DEFAULT_GRPC_ADDR);
        raw.parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddress {
                value: raw.to_owned(),
                message: err.to_string(),
            })
    }

    /// Return the database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }

    pub fn db_min_idle(&self) -> u32 {
        self.db_min_idle.unwrap_or(DEFAULT_DB_MIN_IDLE)
    }

    pub fn db_idle_timeout(&self) -> Duration {
        Duration::from_secs(
            self.db_idle_timeout_secs
                .unwrap_or(DEFAULT_DB_IDLE_TIMEOUT_SECS),
        )
    }

    pub fn shutdown_grace(&self) -> Duration {
        self.shutdown_grace_secs
            .map_or(DEFAULT_SHUTDOWN_GRACE, Duration::from_secs)
    }

    /// Zero disables the server-wide timeout.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Pool configuration derived from these settings.
    ///
    /// # Errors
    ///
    /// Propagates [`SettingsError::MissingDatabaseUrl`].
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(self.db_max_connections())
            .with_min_idle(Some(self.db_min_idle()))
            .with_idle_timeout(Some(self.db_idle_timeout())))
    }

    /// Server configuration derived from these settings.
    ///
    /// # Errors
    ///
    /// Propagates [`SettingsError::InvalidBindAddress`].
    pub fn server_config(&self) -> Result<ServerConfig, SettingsError> {
        Ok(ServerConfig::new(self.bind_addr()?)
            .with_shutdown_grace(self.shutdown_grace())
            .with_request_timeout(self.request_timeout()))
    }
}
