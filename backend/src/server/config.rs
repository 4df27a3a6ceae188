//! gRPC server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

/// Default time in-flight calls get to finish once draining starts.
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Builder-style configuration for the gRPC server.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use todo_backend::server::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1:0".parse().unwrap())
///     .with_shutdown_grace(Duration::from_secs(1))
///     .with_request_timeout(Some(Duration::from_secs(30)));
/// assert_eq!(config.shutdown_grace(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    shutdown_grace: Duration,
    request_timeout: Option<Duration>,
}

impl ServerConfig {
    /// Configuration listening on `bind_addr` with the default grace period
    /// and no server-wide request timeout.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            request_timeout: None,
        }
    }

    /// Bound the drain phase of graceful shutdown.
    #[must_use]
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Cap every call, on top of any caller-supplied `grpc-timeout`.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        self.shutdown_grace
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}
