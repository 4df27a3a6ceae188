//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! gRPC handlers live under [`grpc`].

pub mod grpc;
