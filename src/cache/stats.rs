//! Cache Statistics Module
//!
//! Point-in-time snapshot of entry counts and lookup outcomes.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot returned by `TtlCache::stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Entries currently held, expired or not
    pub total_entries: usize,
    /// Entries that would still be served
    pub active_entries: usize,
    /// Entries past their expiry that no read or sweep has removed yet
    pub expired_entries: usize,
    /// Lookups that returned a value
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
