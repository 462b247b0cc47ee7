//! Key/value cache for GET responses.
//!
//! Entities look up a cache key before issuing a GET and store the decoded
//! JSON body on a miss. The cache is shared through [`OrgConfig`](crate::OrgConfig)
//! so every entity built from the same config sees the same entries.
//!
//! - [`MemoryCache`] - in-process `moka` cache with TTL and an entry bound
//! - [`NoCache`] - never stores; every read is a miss

use std::time::Duration;

use moka::sync::Cache;
use serde_json::Value;

pub trait CacheManager: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    fn remove(&self, key: &str);
    fn clear(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl CacheManager for NoCache {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn set(&self, _key: &str, _value: Value) {}

    fn remove(&self, _key: &str) {}

    fn clear(&self) {}
}

/// In-memory cache with TTL and an entry bound.
///
/// TTL counts from insertion; reads do not extend it.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    entries: Cache<String, Value>,
}

impl MemoryCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
    pub const DEFAULT_MAX_ENTRIES: usize = 512;

    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries.max(1) as u64)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    /// Live entries after pending evictions are applied.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL, Self::DEFAULT_MAX_ENTRIES)
    }
}

impl CacheManager for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key)
    }

    fn set(&self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.invalidate(key);
    }

    fn clear(&self) {
        self.entries.invalidate_all();
    }
}
