//! Transport-level types: remote methods, failures and the transport seam.

use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Remote methods exposed by the verification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Bot account information.
    GetMe,
    /// Subscription verdict for one user.
    Check,
    /// Tasks the user is asked to complete.
    GetTasks,
    /// Re-verify a single task by signature.
    CheckTask,
    /// Tasks the user already completed.
    GetCompletedTasks,
}

impl Method {
    /// Wire name, appended to the base URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GetMe => "get_me",
            Method::Check => "check",
            Method::GetTasks => "get_tasks",
            Method::CheckTask => "check_task",
            Method::GetCompletedTasks => "get_completed_tasks",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during a single round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection could not be established.
    #[error("connection failed: {0}")]
    Connectivity(String),

    /// Request did not complete within its deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Body is not valid JSON.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Anything else (request build failure, body read failure, ...).
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether this failure means the service is unreachable.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, TransportError::Connectivity(_) | TransportError::Timeout(_))
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Connectivity(_) => "connectivity",
            TransportError::Timeout(_) => "timeout",
            TransportError::Malformed(_) => "malformed",
            TransportError::Request(_) => "request",
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Performs exactly one round-trip to a named remote method.
///
/// Implementations inject the API key, send `params` as the JSON body and hand back
/// the decoded body without interpreting `info`/`warning`/`error`/`result`.
pub trait Transport: Send + Sync {
    fn call(
        &self,
        method: Method,
        params: Map<String, Value>,
    ) -> impl Future<Output = TransportResult<Value>> + Send;
}
