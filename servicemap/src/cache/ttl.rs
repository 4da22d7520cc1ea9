use crate::cache::stats::CacheStats;
use crate::Result;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};

struct CacheSlot<T> {
    value: Arc<T>,
    loaded_at: Instant,
}

/// Single-value memo with time-based expiry.
///
/// A refresh builds the new value outside the lock and then swaps the
/// `Arc` in, so readers see either the old or the new value in full. A
/// failed refresh leaves the previous value in place.
pub struct TtlCache<T> {
    name: String,
    ttl: Duration,
    slot: RwLock<Option<CacheSlot<T>>>,
    stats: Arc<CacheStats>,
}

impl<T> TtlCache<T> {
    pub fn new(name: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            ttl,
            slot: RwLock::new(None),
            stats: Arc::new(CacheStats::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }

    /// Current value if one is loaded and still fresh.
    pub fn fresh(&self) -> Option<Arc<T>> {
        let slot = self.slot.read();
        slot.as_ref()
            .filter(|s| s.loaded_at.elapsed() < self.ttl)
            .map(|s| Arc::clone(&s.value))
    }

    /// Last loaded value regardless of age.
    pub fn peek(&self) -> Option<Arc<T>> {
        self.slot.read().as_ref().map(|s| Arc::clone(&s.value))
    }

    pub fn is_stale(&self) -> bool {
        self.fresh().is_none()
    }

    /// Drop the cached value; the next read rebuilds.
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }

    /// Return the fresh value, or run `loader` and swap its result in.
    pub fn get_or_refresh<F>(&self, loader: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.fresh() {
            self.stats.hit();
            crate::metrics::record_cache_lookup(&self.name, true);
            return Ok(value);
        }
        self.stats.miss();
        crate::metrics::record_cache_lookup(&self.name, false);

        let value = match loader() {
            Ok(v) => Arc::new(v),
            Err(e) => {
                self.stats.failure();
                crate::metrics::record_cache_refresh(&self.name, false);
                tracing::warn!(cache = %self.name, error = %e, "Cache refresh failed");
                return Err(e);
            }
        };

        *self.slot.write() = Some(CacheSlot {
            value: Arc::clone(&value),
            loaded_at: Instant::now(),
        });
        self.stats.refresh();
        crate::metrics::record_cache_refresh(&self.name, true);
        tracing::debug!(cache = %self.name, ttl_secs = self.ttl.as_secs(), "Cache refreshed");

        Ok(value)
    }
}
