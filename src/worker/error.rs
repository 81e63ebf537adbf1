//! Executor errors.

use std::time::Duration;

use super::protocol::{FailureCode, WorkerResponse};

/// Failures on the background path.
///
/// None of these reach the caller of the dispatch facade: each one triggers
/// the inline fallback instead.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Worker timeout: request {id} got no response within {after:?}")]
    Timeout { id: u64, after: Duration },

    #[error("Background worker unavailable: {0}")]
    Unavailable(String),

    #[error("Worker rejected operation: {0}")]
    UnknownOperation(String),

    #[error("Worker reported failure: {0}")]
    Remote(String),

    #[error("Executor closed before request {0} was answered")]
    Closed(u64),

    #[error("Worker protocol error: {0}")]
    Protocol(#[from] serde_json::Error),
}

impl ExecutorError {
    /// Map a failed response envelope to an error.
    pub(crate) fn from_response(response: &WorkerResponse) -> Self {
        let message = response
            .error
            .clone()
            .unwrap_or_else(|| "unspecified worker error".to_string());
        match response.code {
            Some(FailureCode::UnknownOperation) => ExecutorError::UnknownOperation(message),
            _ => ExecutorError::Remote(message),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecutorError::Timeout { .. })
    }
}
