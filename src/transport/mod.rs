//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! FlyerClient
//!     → types.rs (Method, Transport trait)
//!     → client.rs (HttpTransport: inject key, POST JSON, decode body)
//!     → remote service
//! ```
//!
//! # Design Decisions
//! - One round-trip per call, no retries
//! - Never logs, never caches; interpretation belongs to the client
//! - The service reports errors in-band, so non-2xx bodies are decoded like any other

pub mod client;
pub mod types;

pub use client::HttpTransport;
pub use types::{Method, Transport, TransportError, TransportResult};
