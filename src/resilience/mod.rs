//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call from FlyerClient:
//!     → circuit_breaker.rs (open? return fail-open default, no request)
//!     → cache.rs (check only: cached "allowed"? return true, no request)
//!     → transport
//!     → On connectivity failure: circuit_breaker.rs trips for the cooldown
//!     → On positive verdict: cache.rs stores it for the TTL
//! ```
//!
//! # Design Decisions
//! - Fail open: an unreachable service never blocks end users
//! - State belongs to one client instance, never to module globals
//! - Time comes from a Clock so windows can be tested deterministically

pub mod cache;
pub mod circuit_breaker;
pub mod clock;

pub use cache::VerdictCache;
pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use clock::{Clock, SystemClock};
