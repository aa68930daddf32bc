//! TTL-bounded cache for catalog-size queries
//!
//! Entries are never removed; they go stale once older than the TTL and are
//! overwritten by the next successful fetch. Concurrent misses on one key may
//! each fetch and write, and the last write wins.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::clock::{Clock, SystemClock};
use crate::models::ProductCountKind;

/// Default time-to-live for cached counts
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Cache key: store id plus the kind of count
pub type CountKey = (String, ProductCountKind);

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    count: u64,
    /// Clock reading when the count was stored
    timestamp: u64,
}

pub struct CountCache {
    entries: DashMap<CountKey, CacheEntry>,
    ttl_millis: u64,
    clock: Arc<dyn Clock>,
}

impl CountCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_millis: ttl.as_millis() as u64,
            clock,
        }
    }

    /// Cache with the wall clock and the given TTL in milliseconds
    pub fn with_ttl_millis(ttl_millis: u64) -> Self {
        Self::new(Duration::from_millis(ttl_millis), Arc::new(SystemClock))
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis)
    }

    /// Cached count for `key` if present and younger than the TTL
    pub fn get(&self, key: &CountKey) -> Option<u64> {
        let entry = *self.entries.get(key)?.value();
        let age = self.clock.now_millis().saturating_sub(entry.timestamp);

        if age < self.ttl_millis {
            debug!("Count cache hit for {}/{} (age {}ms)", key.0, key.1, age);
            Some(entry.count)
        } else {
            debug!("Count cache entry for {}/{} is stale", key.0, key.1);
            None
        }
    }

    /// Store `count` for `key`, replacing whatever was there
    pub fn put(&self, key: CountKey, count: u64) {
        let entry = CacheEntry {
            count,
            timestamp: self.clock.now_millis(),
        };
        self.entries.insert(key, entry);
    }

    /// Number of entries held, stale ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CountCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, Arc::new(SystemClock))
    }
}
