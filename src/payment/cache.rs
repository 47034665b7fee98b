//! Device-local hint of unlock status.
//!
//! The cache is never authoritative. It only saves a store round-trip and
//! keeps the gate usable when the store is unreachable.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Default cache capacity.
const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Fast, non-durable record of unlock flags keyed by tracking identifier.
#[async_trait]
pub trait LocalAccessCache: Send + Sync {
    /// Current flag for `tracking_id`, or `None` if absent or expired.
    async fn get(&self, tracking_id: &str) -> Option<bool>;

    /// Write a flag that stays valid for `ttl_days`.
    async fn set(&self, tracking_id: &str, unlocked: bool, ttl_days: u32);

    /// Forget any flag held for `tracking_id`.
    async fn remove(&self, tracking_id: &str);
}

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    unlocked: bool,
    expires_at: DateTime<Utc>,
}

/// LRU-bounded [`LocalAccessCache`] with per-entry expiry.
#[derive(Clone)]
pub struct LruAccessCache {
    inner: Arc<Mutex<LruCache<String, CacheEntry>>>,
    stats: Arc<Mutex<CacheStats>>,
}

/// Cache statistics for monitoring.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Number of lookups that found a live entry.
    pub hits: u64,
    /// Number of lookups that found nothing usable.
    pub misses: u64,
    /// Number of entries written.
    pub additions: u64,
    /// Number of entries dropped because they had expired.
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl LruAccessCache {
    /// Create a new cache with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a new cache with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(cap))),
            stats: Arc::new(Mutex::new(CacheStats::default())),
        }
    }

    /// Read the flag for `tracking_id` as of `now`, dropping it if expired.
    fn lookup(&self, tracking_id: &str, now: DateTime<Utc>) -> Option<bool> {
        let mut cache = self.inner.lock();
        let entry = cache.get(tracking_id).copied();

        let mut stats = self.stats.lock();
        match entry {
            Some(entry) if entry.expires_at > now => {
                stats.hits += 1;
                Some(entry.unlocked)
            }
            Some(_) => {
                cache.pop(tracking_id);
                stats.expirations += 1;
                stats.misses += 1;
                debug!("Access flag for {} expired", tracking_id);
                None
            }
            None => {
                stats.misses += 1;
                None
            }
        }
    }

    fn insert(&self, tracking_id: &str, unlocked: bool, ttl_days: u32) {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(Duration::days(i64::from(ttl_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.inner.lock().put(
            tracking_id.to_string(),
            CacheEntry {
                unlocked,
                expires_at,
            },
        );
        self.stats.lock().additions += 1;
    }

    /// Get current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Get the current number of entries in the cache.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Clear all entries from the cache.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Default for LruAccessCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocalAccessCache for LruAccessCache {
    async fn get(&self, tracking_id: &str) -> Option<bool> {
        self.lookup(tracking_id, Utc::now())
    }

    async fn set(&self, tracking_id: &str, unlocked: bool, ttl_days: u32) {
        self.insert(tracking_id, unlocked, ttl_days);
    }

    async fn remove(&self, tracking_id: &str) {
        self.inner.lock().pop(tracking_id);
    }
}
