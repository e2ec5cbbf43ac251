//! In-memory TTL cache keyed by content hash.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ballotbox_core::constants::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECS, DEFAULT_SWEEP_INTERVAL_SECS,
};
use ballotbox_core::types::ContentHash;

/// Cache entry stamped with its insertion time.
#[derive(Clone)]
struct CacheEntry {
    payload: Value,
    stored_at: Instant,
}

impl CacheEntry {
    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// How long an entry is served, in seconds
    pub ttl_seconds: u64,
    /// How often the janitor sweeps, in seconds
    pub sweep_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            ttl_seconds: DEFAULT_CACHE_TTL_SECS,
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Janitor period, at least one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

/// Payload cache shared by the fetch, store and remove paths.
///
/// `get` checks age on every read, so an expired entry is never returned
/// even if no sweep has run. Each mutation is one write-locked step.
pub struct ContentCache {
    entries: RwLock<HashMap<ContentHash, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl ContentCache {
    /// Creates a cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::with_ttl(config.ttl(), config.max_entries)
    }

    /// Creates a cache with an explicit TTL (sub-second TTLs are allowed).
    pub fn with_ttl(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the entry TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Gets a live payload.
    pub fn get(&self, hash: &ContentHash) -> Option<Value> {
        self.get_at(hash, Instant::now())
    }

    /// Gets a payload if it is younger than the TTL at `now`.
    pub fn get_at(&self, hash: &ContentHash, now: Instant) -> Option<Value> {
        let entries = self.entries.read();
        entries
            .get(hash)
            .filter(|e| e.age(now) < self.ttl)
            .map(|e| e.payload.clone())
    }

    /// Stores a payload, replacing any existing entry.
    pub fn put(&self, hash: ContentHash, payload: Value) {
        self.put_at(hash, payload, Instant::now());
    }

    /// Stores a payload stamped with `now`.
    pub fn put_at(&self, hash: ContentHash, payload: Value, now: Instant) {
        let mut entries = self.entries.write();

        if !entries.contains_key(&hash) && entries.len() >= self.max_entries {
            let ttl = self.ttl;
            entries.retain(|_, e| e.age(now) <= ttl);

            if entries.len() >= self.max_entries {
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.stored_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            hash,
            CacheEntry {
                payload,
                stored_at: now,
            },
        );
    }

    /// Removes an entry. Returns true if one was present.
    pub fn evict(&self, hash: &ContentHash) -> bool {
        self.entries.write().remove(hash).is_some()
    }

    /// Removes every entry older than the TTL at `now`. Returns how many went.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        let ttl = self.ttl;
        entries.retain(|_, e| e.age(now) <= ttl);
        before - entries.len()
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.age(now) >= self.ttl).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len() - expired,
            capacity: self.max_entries,
        }
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Total entries (including expired)
    pub total_entries: usize,
    /// Entries past their TTL but not yet swept
    pub expired_entries: usize,
    /// Entries `get` would return
    pub valid_entries: usize,
    /// Maximum capacity
    pub capacity: usize,
}
