//! Configuration schema definitions.
//!
//! All types derive Serde traits so a client can be configured from a TOML file,
//! and every field has a default so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Production endpoint of the verification service.
pub const DEFAULT_BASE_URL: &str = "https://api.flyerservice.io";

/// Root configuration for a [`FlyerClient`](crate::FlyerClient).
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Static API key injected into every request body.
    /// An empty key puts the client in fail-open mode.
    pub api_key: String,

    /// Service endpoint; method names are appended as path segments.
    pub base_url: String,

    /// Lifetime of a cached "allowed" verdict in seconds.
    pub cache_ttl_secs: u64,

    /// Maximum number of cached verdicts.
    pub cache_capacity: usize,

    /// How long all calls are short-circuited after a connectivity failure, in seconds.
    pub breaker_cooldown_secs: u64,

    /// Options handed to the HTTP transport.
    pub transport: TransportOptions,
}

impl ClientConfig {
    /// Create a configuration with the given key and defaults for everything else.
    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn breaker_cooldown(&self) -> Duration {
        Duration::from_secs(self.breaker_cooldown_secs)
    }

    /// Whether a usable key is configured.
    pub fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl_secs: 60,
            cache_capacity: 10_000,
            breaker_cooldown_secs: 60,
            transport: TransportOptions::default(),
        }
    }
}

// Never print the key.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &if self.has_key() { "<redacted>" } else { "<empty>" })
            .field("base_url", &self.base_url)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_capacity", &self.cache_capacity)
            .field("breaker_cooldown_secs", &self.breaker_cooldown_secs)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Extra options for the HTTP transport.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportOptions {
    /// Total time allowed for one request/response round-trip, in seconds.
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds (unbounded beyond the request timeout if unset).
    pub connect_timeout_secs: Option<u64>,

    /// Overrides the default `User-Agent` header.
    pub user_agent: Option<String>,

    /// Additional headers sent with every request.
    pub headers: BTreeMap<String, String>,

    /// Honor `HTTP(S)_PROXY` environment variables.
    pub system_proxy: bool,
}

impl TransportOptions {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            request_timeout_secs: 5,
            connect_timeout_secs: None,
            user_agent: None,
            headers: BTreeMap::new(),
            system_proxy: true,
        }
    }
}
