//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! FlyerClient / transport outcomes:
//!     → tracing events (advisories, short-circuits, failures)
//!     → metrics.rs (counters, gauges)
//!
//! Binaries:
//!     → logging.rs installs the subscriber
//! ```
//!
//! # Design Decisions
//! - The API key never appears in any event
//! - Advisory fields from the service are logged at their own severity

pub mod logging;
pub mod metrics;
