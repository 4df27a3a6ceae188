//! gRPC inbound adapter.
//!
//! [`TodoGrpcHandler`] implements the generated `todo.v1.TodoService` trait on
//! top of the driving ports. Protocol types live in [`pb`].

mod error;
mod todo;
mod trace;

pub use error::TRACE_ID_METADATA;
pub use todo::TodoGrpcHandler;
pub use trace::{request_span, traced};

/// Generated protocol types for `todo.v1`.
pub mod pb {
    #![allow(clippy::all, missing_docs)]

    tonic::include_proto!("todo.v1");

    /// Encoded descriptor set served by the reflection service.
    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("todo_descriptor");
}
