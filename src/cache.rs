// Expiring cache — in-memory TTL store for assessment results.
//
// A pure TTL cache: no LRU, no size bound. Expiration is lazy — a `get`
// on an expired entry evicts it and reports a miss, so correctness never
// depends on a background sweep. `cleanup_expired` exists as an optional
// periodic optimization.
//
// Entry count is unbounded; callers that cache per-content results rely
// on the TTL to keep the map from growing without limit.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    last_accessed: Instant,
    expires_at: Instant,
}

/// Point-in-time statistics, exposed via the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub active_entries: usize,
    pub expired_entries: usize,
}

/// Thread-safe key-value store with per-entry time-to-live.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Get a value. An entry past its `expires_at` behaves as a miss and
    /// is evicted in the same call.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get_mut(key) {
            Some(entry) if now >= entry.expires_at => {
                entries.remove(key);
                None
            }
            Some(entry) => {
                entry.last_accessed = now;
                Some(entry.value.clone())
            }
            None => None,
        }
    }

    /// Store a value with the instance default TTL. Always overwrites,
    /// resetting `created_at` and `expires_at`.
    pub fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                created_at: now,
                last_accessed: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Remove a key. Returns whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }

    /// Remove every entry whose `expires_at` has already passed.
    /// Idempotent, and safe to call concurrently with get/set.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(Instant::now())
    }

    fn cleanup_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        let removed = before - entries.len();
        if removed > 0 {
            tracing::info!(removed, "Cleaned up expired cache entries");
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.lock().expect("cache lock poisoned");
        let total = entries.len();
        let expired = entries.values().filter(|e| now >= e.expires_at).count();
        CacheStats {
            total_entries: total,
            active_entries: total - expired,
            expired_entries: expired,
        }
    }

    /// Age of the oldest entry, if any. Used by the status endpoint.
    pub fn oldest_entry_age(&self) -> Option<Duration> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries
            .values()
            .map(|e| e.created_at)
            .min()
            .map(|created| created.elapsed())
    }
}
