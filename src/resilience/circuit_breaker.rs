//! Time-boxed circuit breaker.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: service assumed down, every call returns its fail-open default
//!
//! # State Transitions
//! ```text
//! Closed → Open: any connectivity failure or timeout
//! Open → Closed: cooldown elapsed since the last failure
//! ```
//!
//! # Design Decisions
//! - One breaker per client instance, shared by every operation and user
//! - No half-open probe: the first call after the cooldown is a real request
//! - Never reset early; the failure timestamp only moves forward
//! - Lock-free: the last failure is an atomic offset from a construction epoch

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
}

/// Breaker that opens for `cooldown` after every recorded failure.
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Nanoseconds since `epoch` of the last failure, plus one. Zero means none.
    last_failure: AtomicU64,
    cooldown: Duration,
    epoch: Instant,
}

impl CircuitBreaker {
    /// Create a closed breaker. `epoch` must not be later than any instant passed in afterwards.
    pub fn new(cooldown: Duration, epoch: Instant) -> Self {
        Self {
            last_failure: AtomicU64::new(0),
            cooldown,
            epoch,
        }
    }

    fn offset(&self, at: Instant) -> u64 {
        at.saturating_duration_since(self.epoch)
            .as_nanos()
            .try_into()
            .unwrap_or(u64::MAX - 1)
    }

    /// Record a connectivity failure observed at `now`.
    pub fn trip(&self, now: Instant) {
        let stamp = self.offset(now).saturating_add(1);
        self.last_failure.fetch_max(stamp, Ordering::AcqRel);
    }

    /// Time left before the breaker closes, if it is open.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let stamp = self.last_failure.load(Ordering::Acquire);
        if stamp == 0 {
            return None;
        }

        let failed_at = Duration::from_nanos(stamp - 1);
        let reopens_at = failed_at.saturating_add(self.cooldown);
        let now = Duration::from_nanos(self.offset(now));

        if now < reopens_at {
            Some(reopens_at - now)
        } else {
            None
        }
    }

    pub fn is_open(&self, now: Instant) -> bool {
        self.remaining(now).is_some()
    }

    pub fn state(&self, now: Instant) -> CircuitState {
        if self.is_open(now) {
            CircuitState::Open
        } else {
            CircuitState::Closed
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}
