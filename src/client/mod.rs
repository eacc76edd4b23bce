//! Client subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → flyer.rs preflight (API key? private user id? breaker closed?)
//!     → verdict cache (check_subscription only)
//!     → transport round-trip
//!     → envelope decode, advisories logged
//!     → value | fail-open default | ServiceError
//! ```
//!
//! # Design Decisions
//! - Fail open everywhere except an explicit service rejection
//! - A success envelope without `skip` means "not yet allowed"
//! - No locks: cache and breaker updates are single atomic steps

mod flyer;

pub use flyer::FlyerClient;
