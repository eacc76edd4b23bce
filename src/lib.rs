//! Resilient client for the Flyer subscription-verification service.
//!
//! Bots call [`FlyerClient::check_subscription`] before serving a user; users who still
//! have tasks to complete (subscribe, vote, follow a link) get `false` and can be shown
//! the tasks from [`FlyerClient::list_tasks`].
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ──▶ FlyerClient ──▶ preflight ──▶ VerdictCache ──▶ Transport ──▶ service
//!                  │              │                              │
//!                  │        CircuitBreaker ◀── connectivity ─────┘
//!                  ▼
//!     value | fail-open default | ServiceError
//! ```
//!
//! The client fails open: a missing key, an invalid user id, an open breaker, an
//! unreachable service or a malformed response all let the user through. The only
//! error an operation returns is [`ServiceError`], for explicit rejections such as
//! an invalid key.

// Core subsystems
pub mod api;
pub mod client;
pub mod config;
pub mod transport;

// Cross-cutting concerns
pub mod observability;
pub mod resilience;

#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;

pub use api::{ServiceError, ServiceResult, Task, TaskStatus};
pub use client::FlyerClient;
pub use config::{ClientConfig, ConfigError};
pub use resilience::CircuitState;
pub use transport::{HttpTransport, Method, Transport, TransportError};
