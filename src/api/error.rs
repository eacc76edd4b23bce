//! Errors surfaced to callers of [`FlyerClient`](crate::FlyerClient).

use thiserror::Error;

use crate::transport::Method;

/// The service explicitly rejected a request (bad key, unknown bot, ...).
///
/// This is the only error the client's operations return. Outages, malformed
/// bodies and invalid arguments are absorbed into each operation's fail-open default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method} rejected by service: {message}")]
pub struct ServiceError {
    pub method: Method,
    pub message: String,
}

impl ServiceError {
    pub fn new(method: Method, message: impl Into<String>) -> Self {
        Self {
            method,
            message: message.into(),
        }
    }

    /// The message the service put in its `error` field.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type for client operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
