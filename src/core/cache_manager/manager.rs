//! Cache manager implementation

use super::types::{AtomicCacheStats, CacheConfig, CacheEntry, CacheKey, CacheStats};
use crate::utils::error::{GatewayError, Result};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// TTL- and capacity-bounded cache
///
/// Entries live in an `LruCache` that is only ever read with `peek`, so its
/// recency order is the insertion order and `push` evicts the oldest entry.
pub struct CacheManager<V> {
    entries: Mutex<LruCache<CacheKey, CacheEntry<V>>>,
    /// Default TTL in milliseconds; tunable at runtime
    default_ttl_ms: AtomicU64,
    stats: AtomicCacheStats,
}

impl<V: Clone + Send + 'static> CacheManager<V> {
    /// Create a new cache manager
    pub fn new(config: CacheConfig) -> Result<Self> {
        let capacity = NonZeroUsize::new(config.max_entries).ok_or_else(|| {
            GatewayError::Config(
                "Invalid cache configuration: max_entries must be greater than 0".to_string(),
            )
        })?;

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            default_ttl_ms: AtomicU64::new(config.default_ttl.as_millis() as u64),
            stats: AtomicCacheStats::default(),
        })
    }

    /// Get a cached value; expired entries are removed and count as misses
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired = match entries.peek(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            self.stats.expirations.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, expired, "cache miss");
        None
    }

    /// Store a value; `ttl` defaults to the configured TTL
    ///
    /// Overwriting a key keeps its position in the eviction order. Inserting
    /// a new key into a full cache evicts exactly the oldest-inserted entry.
    pub fn set(&self, key: CacheKey, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl.unwrap_or_else(|| self.default_ttl()));
        let mut entries = self.entries.lock();
        self.stats.insertions.fetch_add(1, Ordering::Relaxed);

        if let Some(existing) = entries.peek_mut(&key) {
            *existing = entry;
            return;
        }

        if let Some((evicted, _)) = entries.push(key, entry) {
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key = %evicted, "evicted oldest cache entry");
        }
    }

    /// Remove every expired entry; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired: Vec<CacheKey> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        drop(entries);

        if !expired.is_empty() {
            self.stats
                .expirations
                .fetch_add(expired.len() as u64, Ordering::Relaxed);
            info!("Cleaned up {} expired cache entries", expired.len());
        }
        expired.len()
    }

    /// Spawn the periodic sweep
    ///
    /// The task holds a weak reference and stops once the cache is dropped.
    pub fn start_cleanup_task(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match cache.upgrade() {
                    Some(cache) => {
                        cache.cleanup_expired();
                    }
                    None => break,
                }
            }
        })
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms.load(Ordering::Relaxed))
    }

    /// Change the TTL used by future writes; existing entries keep theirs
    pub fn set_default_ttl(&self, ttl: Duration) {
        self.default_ttl_ms
            .store(ttl.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Change the capacity; shrinking drops the oldest entries first
    pub fn resize(&self, max_entries: usize) -> Result<()> {
        let capacity = NonZeroUsize::new(max_entries).ok_or_else(|| {
            GatewayError::Config(
                "Invalid cache configuration: max_entries must be greater than 0".to_string(),
            )
        })?;

        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.resize(capacity);
        let dropped = before.saturating_sub(entries.len());
        drop(entries);

        if dropped > 0 {
            self.stats
                .evictions
                .fetch_add(dropped as u64, Ordering::Relaxed);
        }
        debug!(max_entries, dropped, "cache resized");
        Ok(())
    }

    /// Get cache statistics (lock-free counters plus current size)
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    /// Clear all entries and statistics
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.stats.reset();
        info!("Cache cleared");
    }
}
