use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::{Cache, CacheBuilder};

use crate::metric_consts::RESULT_CACHE_COUNTER;
use crate::types::CategoryTrafficSource;

/// Bounded, time-expiring store for computed attribution results, shared by
/// every resolver in the process.
///
/// Entries become eligible for eviction 5 minutes after write and 5 minutes
/// after last read, whichever comes first (both windows are enforced
/// simultaneously). Reads never fail for missing keys; writes are idempotent
/// overwrites. Safe for concurrent use with no external locking.
#[derive(Debug)]
pub struct ResultCache {
    entries: Cache<String, CategoryTrafficSource>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    pub fn new(max_capacity: u64, ttl: Duration, tti: Duration) -> Self {
        let entries = CacheBuilder::new(max_capacity)
            .time_to_live(ttl)
            .time_to_idle(tti)
            .build();
        Self {
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<CategoryTrafficSource> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(RESULT_CACHE_COUNTER, "outcome" => "hit").increment(1);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(RESULT_CACHE_COUNTER, "outcome" => "miss").increment(1);
                None
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn put(&self, key: String, value: CategoryTrafficSource) {
        self.entries.insert(key, value);
    }

    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn miss_count(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
