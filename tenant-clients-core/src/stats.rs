use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing how a tenant client cache is being used.
///
/// Only tenant-scoped lookups are counted. Requests served by the default
/// client because the resource carries no project alias are not recorded.
///
/// - a **hit** found an already constructed client,
/// - a **miss** ran the construction procedure,
/// - a **fallback** is a miss whose construction failed and was answered with
///   the default client.
///
/// # Thread Safety
///
/// All operations use atomic operations with `Relaxed` ordering.
///
/// # Examples
///
/// ```
/// use tenant_clients_core::CacheStats;
///
/// let stats = CacheStats::new();
///
/// stats.record_miss();
/// stats.record_hit();
/// stats.record_hit();
/// stats.record_fallback();
///
/// assert_eq!(stats.hits(), 2);
/// assert_eq!(stats.misses(), 1);
/// assert_eq!(stats.fallbacks(), 1);
/// assert_eq!(stats.total_accesses(), 3);
/// ```
#[derive(Debug)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    fallbacks: AtomicU64,
}

impl CacheStats {
    /// Creates a new `CacheStats` instance with zero counters.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            fallbacks: AtomicU64::new(0),
        }
    }

    /// Records a lookup answered by an already constructed client.
    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a lookup that ran the construction procedure.
    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records that a failed construction was answered with the default client.
    #[inline]
    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of cache hits.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Returns the number of cache misses.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Returns the number of lookups answered with the default client after a
    /// failed construction.
    #[inline]
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Returns the total number of tenant-scoped lookups (hits + misses).
    #[inline]
    pub fn total_accesses(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// Calculates and returns the cache hit rate as a fraction (0.0 to 1.0).
    ///
    /// Returns 0.0 if there have been no accesses.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenant_clients_core::CacheStats;
    ///
    /// let stats = CacheStats::new();
    /// stats.record_miss();
    /// stats.record_hit();
    /// stats.record_hit();
    ///
    /// assert!((stats.hit_rate() - 0.6666).abs() < 0.001);
    /// ```
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_accesses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }

    /// Fraction of misses that ended in a fallback to the default client.
    #[inline]
    pub fn fallback_rate(&self) -> f64 {
        let misses = self.misses();
        if misses == 0 {
            0.0
        } else {
            self.fallbacks() as f64 / misses as f64
        }
    }

    /// Resets all statistics counters to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
    }
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CacheStats {
    fn clone(&self) -> Self {
        Self {
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
            fallbacks: AtomicU64::new(self.fallbacks()),
        }
    }
}
