//! Cache Store Module
//!
//! Main cache engine: a mutex-guarded HashMap of entries with per-entry expiry,
//! lazy removal on read and a full sweep used by the reaper.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Callback invoked for every entry the sweep removes.
pub type EvictionListener<V> = Box<dyn Fn(&str, &V) + Send + Sync>;

// == TTL Parsing ==
/// Converts a caller-supplied TTL in seconds into a Duration.
///
/// Negative, NaN, infinite or unrepresentable values are rejected with
/// `InvalidArgument`; nothing is clamped.
pub fn ttl_from_secs(ttl_seconds: f64) -> Result<Duration> {
    if !ttl_seconds.is_finite() || ttl_seconds < 0.0 {
        return Err(CacheError::invalid(format!(
            "ttl_seconds must be a non-negative number, got {}",
            ttl_seconds
        )));
    }
    Duration::try_from_secs_f64(ttl_seconds)
        .map_err(|e| CacheError::invalid(format!("ttl_seconds out of range: {}", e)))
}

// == TTL Cache ==
/// In-process key/value store where every entry carries its own expiry.
///
/// All operations take one store-wide mutex and never await, so each of
/// `get`, `set`, `delete`, `clear` and the sweep is atomic. Sequences of
/// calls are not.
pub struct TtlCache<V = Value> {
    /// Key-value storage
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    /// Lookups that returned a value
    hits: AtomicU64,
    /// Lookups that returned nothing
    misses: AtomicU64,
    /// TTL applied by `set_default`
    default_ttl: Option<Duration>,
    /// Notified for entries removed by the sweep
    listener: Option<EvictionListener<V>>,
    /// Set while a reaper owns this cache
    reaper_attached: AtomicBool,
}

impl<V> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache with no default TTL.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            default_ttl: None,
            listener: None,
            reaper_attached: AtomicBool::new(false),
        }
    }

    /// Creates an empty cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut cache = Self::new();
        if let Some(ttl) = config.default_ttl_seconds {
            cache.default_ttl = Some(ttl_from_secs(ttl)?);
        }
        Ok(cache)
    }

    /// Sets the TTL used by `set_default`.
    pub fn with_default_ttl(mut self, ttl_seconds: f64) -> Result<Self> {
        self.default_ttl = Some(ttl_from_secs(ttl_seconds)?);
        Ok(self)
    }

    /// Registers a callback run for every entry the sweep removes.
    pub fn with_eviction_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // Entries are plain data; a panic elsewhere cannot leave them half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// An entry found past its expiry is removed before reporting a miss.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let now = Instant::now();
        let mut entries = self.lock();

        match entries.get(key) {
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache miss");
                return None;
            }
            Some(entry) if !entry.is_expired_at(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => {}
        }

        entries.remove(key);
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key, "cache miss (expired entry removed)");
        None
    }

    // == Set ==
    /// Stores a value that expires `ttl_seconds` from now.
    ///
    /// Any existing entry for the key is replaced. A TTL of zero is legal and
    /// makes the entry stale on the next read.
    pub fn set(&self, key: impl Into<String>, value: V, ttl_seconds: f64) -> Result<()> {
        let ttl = ttl_from_secs(ttl_seconds)?;
        self.insert(key, value, ttl);
        Ok(())
    }

    /// Stores a value using the configured default TTL.
    pub fn set_default(&self, key: impl Into<String>, value: V) -> Result<()> {
        let ttl = self
            .default_ttl
            .ok_or_else(|| CacheError::invalid("no default TTL configured; pass ttl_seconds"))?;
        self.insert(key, value, ttl);
        Ok(())
    }

    /// Stores a value with an already-validated TTL.
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry::new(value, ttl);
        self.lock().insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // == Stats ==
    /// Returns entry counts and lookup counters without modifying the store.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.lock();
        let active_entries = entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count();

        CacheStats {
            total_entries: entries.len(),
            active_entries,
            expired_entries: entries.len() - active_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed. The eviction listener runs after
    /// the lock is released; a panic in it is logged and the remaining entries
    /// are still reported.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed: Vec<(String, CacheEntry<V>)> = Vec::new();

        {
            let mut entries = self.lock();
            let expired_keys: Vec<String> = entries
                .iter()
                .filter(|(_, entry)| entry.is_expired_at(now))
                .map(|(key, _)| key.clone())
                .collect();

            for key in expired_keys {
                if let Some(entry) = entries.remove(&key) {
                    removed.push((key, entry));
                }
            }
        }

        if let Some(listener) = &self.listener {
            for (key, entry) in &removed {
                let outcome =
                    panic::catch_unwind(AssertUnwindSafe(|| listener(key.as_str(), &entry.value)));
                if outcome.is_err() {
                    warn!(key = %key, "eviction listener panicked; continuing sweep");
                }
            }
        }

        removed.len()
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Claims the single reaper slot. Returns false if one is already attached.
    pub(crate) fn attach_reaper(&self) -> bool {
        self.reaper_attached
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn detach_reaper(&self) {
        self.reaper_attached.store(false, Ordering::Release);
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.len())
            .field("default_ttl", &self.default_ttl)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
