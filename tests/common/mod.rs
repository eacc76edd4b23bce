//! Shared utilities for integration tests: an in-process mock of the service.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use flyer_client::ClientConfig;

/// Canned reply for one method.
#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request the mock received.
#[derive(Clone, Debug)]
pub struct Received {
    pub method: String,
    pub body: Value,
    pub headers: HeaderMap,
}

#[derive(Default)]
struct Inner {
    replies: HashMap<String, Reply>,
    received: Vec<Received>,
}

/// Programmable mock service. Clones share replies and the request log.
#[derive(Clone, Default)]
pub struct MockService {
    inner: Arc<Mutex<Inner>>,
}

#[allow(dead_code)]
impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: &str, reply: Reply) -> &Self {
        self.inner.lock().unwrap().replies.insert(method.to_string(), reply);
        self
    }

    pub fn received(&self) -> Vec<Received> {
        self.inner.lock().unwrap().received.clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.lock().unwrap().received.len()
    }

    /// Serve on an ephemeral port.
    pub async fn start(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        self.serve(listener)
    }

    /// Serve on a specific address.
    pub async fn start_on(&self, addr: SocketAddr) -> SocketAddr {
        let listener = TcpListener::bind(addr).await.unwrap();
        self.serve(listener)
    }

    fn serve(&self, listener: TcpListener) -> SocketAddr {
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/{method}", post(handle))
            .with_state(self.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        addr
    }
}

async fn handle(
    State(service): State<MockService>,
    Path(method): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let reply = {
        let mut inner = service.inner.lock().unwrap();
        inner.received.push(Received {
            method: method.clone(),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
            headers,
        });
        inner.replies.get(&method).cloned()
    };

    let Some(reply) = reply else {
        return (StatusCode::NOT_FOUND, "{\"error\": \"unknown method\"}").into_response();
    };

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    // Plain-text content type on purpose: the client must not rely on it.
    let status = StatusCode::from_u16(reply.status).unwrap();
    (status, reply.body).into_response()
}

/// A port nothing is listening on.
#[allow(dead_code)]
pub fn closed_port() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Client config pointing at a local mock.
pub fn config_for(addr: SocketAddr, key: &str) -> ClientConfig {
    let mut config = ClientConfig::with_key(key);
    config.base_url = format!("http://{}", addr);
    config.transport.system_proxy = false;
    config
}
