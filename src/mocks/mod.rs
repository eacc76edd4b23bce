//! Test doubles for the client's seams.
//!
//! Available in this crate's own tests and, for downstream crates, with the
//! `test-helpers` feature:
//!
//! ```toml
//! [dev-dependencies]
//! flyer-client = { version = "*", features = ["test-helpers"] }
//! ```

mod clock;
mod logs;
mod transport;

pub use clock::MockClock;
pub use logs::{CapturedEvent, LogCapture};
pub use transport::{RecordedCall, ScriptedTransport};
