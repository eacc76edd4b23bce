//! HTTP transport backed by reqwest.
//!
//! # Responsibilities
//! - POST `{"key": ..., ...params}` to `base_url/method`
//! - Enforce the configured request timeout
//! - Decode the body as JSON whatever the status code or content type
//! - Classify failures (connectivity, timeout, malformed, other)

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::{ClientConfig, ConfigError};
use crate::transport::types::{Method, Transport, TransportError, TransportResult};

/// Transport that talks to the real service over HTTPS.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport from a client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let options = &config.transport;
        let timeout = options.request_timeout();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfigError::Http(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ConfigError::Http(format!("invalid value for header '{}': {}", name, e)))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder().default_headers(headers).timeout(timeout);
        if let Some(secs) = options.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if !options.system_proxy {
            builder = builder.no_proxy();
        }
        if let Some(agent) = &options.user_agent {
            builder = builder.user_agent(agent.clone());
        } else {
            builder = builder.user_agent(concat!("flyer-client/", env!("CARGO_PKG_VERSION")));
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        })
    }

    /// Full URL for a remote method.
    pub fn endpoint(&self, method: Method) -> String {
        format!("{}/{}", self.base_url, method.as_str())
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connectivity(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Request body: caller params with the key injected.
pub fn build_body(api_key: &str, mut params: Map<String, Value>) -> Value {
    params.insert("key".to_string(), Value::String(api_key.to_string()));
    Value::Object(params)
}

impl Transport for HttpTransport {
    async fn call(&self, method: Method, params: Map<String, Value>) -> TransportResult<Value> {
        let body = build_body(&self.api_key, params);

        let response = self
            .client
            .post(self.endpoint(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        // The service reports errors in-band, so the status only matters for debugging.
        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            TransportError::Malformed(format!(
                "status {}, {} bytes: {}",
                status,
                bytes.len(),
                e
            ))
        })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
