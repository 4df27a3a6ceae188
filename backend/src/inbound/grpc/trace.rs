//! Per-call trace scoping for gRPC handlers.
//!
//! The server installs a `grpc_request` span for every call with an empty
//! `trace_id` field. [`traced`] fills it in, opens the matching [`TraceId`]
//! scope for the handler body and echoes the identifier back in response
//! metadata.

use std::future::Future;

use tonic::{Response, Status};
use tracing::Span;

use crate::domain::TraceId;

use super::error::insert_trace_id;

/// Build the span the server wraps around each call.
pub fn request_span(request: &http::Request<()>) -> Span {
    tracing::info_span!(
        "grpc_request",
        method = %request.uri().path(),
        trace_id = tracing::field::Empty,
    )
}

/// Run a handler body under a fresh trace identifier.
pub async fn traced<T, Fut>(fut: Fut) -> Result<Response<T>, Status>
where
    Fut: Future<Output = Result<Response<T>, Status>>,
{
    let trace_id = TraceId::generate();
    Span::current().record("trace_id", tracing::field::display(trace_id));

    let mut response = TraceId::scope(trace_id, fut).await?;
    insert_trace_id(response.metadata_mut(), &trace_id.to_string());
    Ok(response)
}
