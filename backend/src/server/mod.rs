//! gRPC server construction, health/reflection wiring and graceful shutdown.
//!
//! [`TodoServer::bind`] opens the listener so callers learn the real address
//! (tests bind port 0). [`BoundServer::serve_until`] then serves the todo,
//! health and reflection services until the supplied shutdown future
//! resolves, drains for at most the configured grace period and returns.

mod config;
mod lifecycle;
mod shutdown;

pub use config::{DEFAULT_SHUTDOWN_GRACE, ServerConfig};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use shutdown::shutdown_signal;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic_health::ServingStatus;
use tonic_health::server::HealthReporter;
use tracing::{info, warn};

use crate::domain::ports::{TodoCommand, TodoQuery};
use crate::inbound::grpc::pb::todo_service_server::TodoServiceServer;
use crate::inbound::grpc::{TodoGrpcHandler, pb, request_span};

/// Errors raised while starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not bind the configured address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// The reflection service rejected the compiled descriptor set.
    #[error("failed to build reflection service: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),
    /// The transport failed while serving.
    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

type TodoServiceImpl = TodoServiceServer<TodoGrpcHandler>;

/// Unbound server holding its configuration and driving ports.
pub struct TodoServer {
    config: ServerConfig,
    handler: TodoGrpcHandler,
    lifecycle: Arc<Lifecycle>,
}

impl TodoServer {
    /// Assemble a server over the command and query ports.
    pub fn new(
        config: ServerConfig,
        command: Arc<dyn TodoCommand>,
        query: Arc<dyn TodoQuery>,
    ) -> Self {
        Self {
            config,
            handler: TodoGrpcHandler::new(command, query),
            lifecycle: Arc::new(Lifecycle::new()),
        }
    }

    /// Shared handle onto the server's lifecycle state.
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.lifecycle)
    }

    /// Bind the configured address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] when the socket cannot be bound.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;
        Ok(BoundServer {
            server: self,
            listener,
            local_addr,
        })
    }
}

/// Server with an open listener, ready to serve.
pub struct BoundServer {
    server: TodoServer,
    listener: TcpListener,
    local_addr: SocketAddr,
}

async fn report_status(reporter: &HealthReporter, status: ServingStatus) {
    match status {
        ServingStatus::Serving => reporter.set_serving::<TodoServiceImpl>().await,
        _ => reporter.set_not_serving::<TodoServiceImpl>().await,
    }
    // Empty service name is the overall server status.
    reporter.set_service_status("", status).await;
}

impl BoundServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Shared handle onto the server's lifecycle state.
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        self.server.lifecycle()
    }

    /// Serve until `shutdown` resolves, then drain.
    ///
    /// Draining flips health to `NOT_SERVING`, stops accepting connections and
    /// waits for in-flight calls. If they outlast the grace period the server
    /// future is dropped, aborting them.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when reflection cannot be built or the
    /// transport fails.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let Self {
            server,
            listener,
            local_addr,
        } = self;
        let TodoServer {
            config,
            handler,
            lifecycle,
        } = server;

        let (reporter, health_service) = tonic_health::server::health_reporter();
        let reflection_service = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(pb::FILE_DESCRIPTOR_SET)
            .register_encoded_file_descriptor_set(tonic_health::pb::FILE_DESCRIPTOR_SET)
            .build_v1()?;

        let mut builder = Server::builder().trace_fn(request_span);
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let (drain_tx, drain_rx) = oneshot::channel::<()>();
        let serve = builder
            .add_service(health_service)
            .add_service(reflection_service)
            .add_service(TodoServiceServer::new(handler))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
                // A dropped sender also means "stop".
                let _ = drain_rx.await;
            });
        tokio::pin!(serve);
        tokio::pin!(shutdown);

        report_status(&reporter, ServingStatus::Serving).await;
        lifecycle.mark_listening();
        info!(addr = %local_addr, "gRPC server listening");

        tokio::select! {
            result = &mut serve => {
                lifecycle.mark_stopped();
                return result.map_err(ServerError::from);
            }
            () = &mut shutdown => {}
        }

        lifecycle.mark_draining();
        report_status(&reporter, ServingStatus::NotServing).await;
        let _ = drain_tx.send(());

        let grace = config.shutdown_grace();
        let outcome = match tokio::time::timeout(grace, &mut serve).await {
            Ok(result) => result.map_err(ServerError::from),
            Err(_) => {
                warn!(
                    grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX),
                    "grace period elapsed; aborting in-flight calls"
                );
                Ok(())
            }
        };
        lifecycle.mark_stopped();
        info!("gRPC server stopped");
        outcome
    }
}
