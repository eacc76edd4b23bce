//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, capacity > 0)
//! - Check the endpoint is a usable http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - An empty API key is not an error: the client runs fail-open without one

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("transport.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("cache_capacity must be greater than zero")]
    ZeroCacheCapacity,

    #[error("transport.headers contains an empty header name")]
    EmptyHeaderName,
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.transport.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.cache_capacity == 0 {
        errors.push(ValidationError::ZeroCacheCapacity);
    }

    if config.transport.headers.keys().any(|name| name.trim().is_empty()) {
        errors.push(ValidationError::EmptyHeaderName);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
