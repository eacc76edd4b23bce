//! Cache of positive subscription verdicts.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics;

/// user id -> expiry instant. Dropping the map takes its entries off the gauge.
#[derive(Debug, Default)]
struct Entries(DashMap<i64, Instant>);

impl Drop for Entries {
    fn drop(&mut self) {
        metrics::record_cache_entries_removed(self.0.len());
    }
}

/// A thread-safe, TTL-bounded set of users known to be allowed.
///
/// Only "allowed" verdicts are stored: a user who still has tasks to complete is
/// re-checked on every call. Entries expire `ttl` after they were written.
#[derive(Debug, Clone)]
pub struct VerdictCache {
    inner: Arc<Entries>,
    ttl: Duration,
    capacity: usize,
}

impl VerdictCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::new(Entries::default()),
            ttl,
            capacity,
        }
    }

    /// Whether `user_id` has an unexpired positive verdict. Expired entries are evicted.
    pub fn is_allowed(&self, user_id: i64, now: Instant) -> bool {
        let fresh = match self.inner.0.get(&user_id) {
            Some(expiry) => *expiry > now,
            None => return false,
        };

        if !fresh && self.inner.0.remove_if(&user_id, |_, expiry| *expiry <= now).is_some() {
            metrics::record_cache_entries_removed(1);
        }
        fresh
    }

    /// Remember that `user_id` is allowed until `now + ttl`.
    ///
    /// Returns false when the cache is full of live entries and the verdict was not stored.
    pub fn allow(&self, user_id: i64, now: Instant) -> bool {
        if self.ttl.is_zero() {
            return false;
        }

        let entries = &self.inner.0;
        if !entries.contains_key(&user_id) && entries.len() >= self.capacity {
            self.purge_expired(now);
            if entries.len() >= self.capacity {
                tracing::debug!(user_id, capacity = self.capacity, "Verdict cache full, skipping");
                return false;
            }
        }

        if entries.insert(user_id, now + self.ttl).is_none() {
            metrics::record_cache_entries_added(1);
        }
        true
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self, now: Instant) {
        let mut removed = 0;
        self.inner.0.retain(|_, expiry| {
            let live = *expiry > now;
            if !live {
                removed += 1;
            }
            live
        });
        metrics::record_cache_entries_removed(removed);
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.inner.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.0.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
