//! Metrics collection.
//!
//! # Metrics
//! - `flyer_requests_total` (counter): remote calls by method and outcome
//! - `flyer_short_circuits_total` (counter): calls answered without a request, by reason
//! - `flyer_breaker_trips_total` (counter): connectivity failures that opened the breaker
//! - `flyer_cache_hits_total` (counter): verdicts served from the cache
//! - `flyer_cache_entries` (gauge): cached verdicts summed over every live client
//!
//! # Design Decisions
//! - Uses the `metrics` facade; the embedding application installs a recorder
//! - Without a recorder every call is a no-op

use metrics::{counter, gauge};

use crate::transport::Method;

/// Record one remote call and how it ended.
pub fn record_request(method: Method, outcome: &'static str) {
    counter!(
        "flyer_requests_total",
        "method" => method.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a call answered locally.
pub fn record_short_circuit(method: Method, reason: &'static str) {
    counter!(
        "flyer_short_circuits_total",
        "method" => method.as_str(),
        "reason" => reason
    )
    .increment(1);
}

pub fn record_breaker_trip(method: Method) {
    counter!("flyer_breaker_trips_total", "method" => method.as_str()).increment(1);
}

pub fn record_cache_hit() {
    counter!("flyer_cache_hits_total").increment(1);
}

/// Adjust the cache gauge by entries added or removed. Deltas, so clients add up.
pub fn record_cache_entries_added(count: usize) {
    if count > 0 {
        gauge!("flyer_cache_entries").increment(count as f64);
    }
}

pub fn record_cache_entries_removed(count: usize) {
    if count > 0 {
        gauge!("flyer_cache_entries").decrement(count as f64);
    }
}
