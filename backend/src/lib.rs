//! Todo service library: domain rules, gRPC and PostgreSQL adapters, and the
//! server bootstrap.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
pub mod settings;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
