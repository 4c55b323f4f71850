use crate::cache::clock::SystemClock;
use crate::domain::ports::Clock;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub data: V,
    pub timestamp: Instant,
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Live while `now - timestamp <= ttl`.
    pub fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) <= self.ttl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub expired: usize,
}

/// In-memory key/value store with per-entry expiry.
///
/// Expired entries are evicted lazily when read, or in bulk by [`TtlCache::cleanup`].
/// All map access goes through one mutex; the lock is never held while a
/// `get_or_set` factory runs, so two callers missing the same key may both
/// compute and the later write wins.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
            clock,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Stores a fresh entry, replacing whatever was under `key`.
    pub fn set(&self, key: impl Into<String>, data: V, ttl: Option<Duration>) {
        let entry = CacheEntry {
            data,
            timestamp: self.clock.now(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Returns the value if still live. A stale entry is removed on the way out.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let live = entries.get(key)?.is_live(now);
        if live {
            entries.get(key).map(|entry| entry.data.clone())
        } else {
            entries.remove(key);
            tracing::trace!("Evicted expired cache entry on read: {}", key);
            None
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn get_or_set<F>(&self, key: &str, factory: F, ttl: Option<Duration>) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(data) = self.get(key) {
            return data;
        }

        let data = factory();
        self.set(key, data.clone(), ttl);
        data
    }

    /// Like [`TtlCache::get_or_set`], but a failed factory leaves the cache untouched.
    pub fn try_get_or_set<F, E>(
        &self,
        key: &str,
        factory: F,
        ttl: Option<Duration>,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        if let Some(data) = self.get(key) {
            return Ok(data);
        }

        let data = factory()?;
        self.set(key, data.clone(), ttl);
        Ok(data)
    }

    /// Read-only view: `expired` is counted without evicting anything.
    pub fn get_stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.lock();
        CacheStats {
            size: entries.len(),
            expired: entries.values().filter(|entry| !entry.is_live(now)).count(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
