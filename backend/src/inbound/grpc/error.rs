//! gRPC adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type transport-agnostic while giving every
//! handler the same status codes, messages and `trace-id` metadata.

use tonic::metadata::MetadataValue;
use tonic::{Code, Status};
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, NOT_FOUND_MESSAGE};

/// Metadata key carrying the per-call correlation identifier.
pub const TRACE_ID_METADATA: &str = "trace-id";

fn code_for(code: ErrorCode) -> Code {
    match code {
        ErrorCode::InvalidRequest => Code::InvalidArgument,
        ErrorCode::NotFound => Code::NotFound,
        ErrorCode::InternalError => Code::Internal,
    }
}

fn message_for(error: &Error) -> String {
    match error.code() {
        ErrorCode::InvalidRequest => error.message().to_owned(),
        ErrorCode::NotFound => NOT_FOUND_MESSAGE.to_owned(),
        ErrorCode::InternalError => format!("internal error: {}", error.message()),
    }
}

/// Attach `trace_id` to outgoing metadata, skipping values that are not
/// valid ASCII metadata.
pub(crate) fn insert_trace_id(metadata: &mut tonic::metadata::MetadataMap, trace_id: &str) {
    if let Ok(value) = MetadataValue::try_from(trace_id) {
        metadata.insert(TRACE_ID_METADATA, value);
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err.code() {
            ErrorCode::InternalError => {
                error!(error = %err, trace_id = err.trace_id(), "todo request failed");
            }
            ErrorCode::InvalidRequest | ErrorCode::NotFound => {
                debug!(code = ?err.code(), error = %err, "todo request rejected");
            }
        }

        let mut status = Status::new(code_for(err.code()), message_for(&err));
        if let Some(trace_id) = err.trace_id() {
            insert_trace_id(status.metadata_mut(), trace_id);
        }
        status
    }
}
