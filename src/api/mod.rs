//! Service API types.
//!
//! # Data Flow
//! ```text
//! raw JSON body (from transport)
//!     → envelope.rs (Envelope<P> → Advisories + Outcome)
//!     → task.rs (typed Task / TaskStatus payloads)
//!     → error.rs (ServiceError for Outcome::Rejected)
//! ```
//!
//! # Design Decisions
//! - Envelopes are decoded once, at the client boundary
//! - "Service said no" (ServiceError) and "service is down" (fail-open default)
//!   never share a type

pub mod envelope;
pub mod error;
pub mod task;

pub use envelope::{Advisories, Envelope, Outcome, Payload, ResultPayload, SkipPayload};
pub use error::{ServiceError, ServiceResult};
pub use task::{Task, TaskStatus};
