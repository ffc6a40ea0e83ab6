//! Cached Query Module
//!
//! Read-through helper used by resolvers: return a fresh cached value, or run
//! the expensive read once, store its result and return it.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::cache::{store::ttl_from_secs, TtlCache};
use crate::error::Result;

// == Cache Policy ==
/// Per-operation TTL choice.
///
/// Each call site picks its own policy; there is no global TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    ttl: Duration,
}

impl CachePolicy {
    /// Cheap or volatile aggregates: five minutes of staleness is acceptable.
    pub const VOLATILE: CachePolicy = CachePolicy::new(Duration::from_secs(300));

    /// Expensive, slow-changing aggregates: recompute at most hourly.
    pub const AGGREGATE: CachePolicy = CachePolicy::new(Duration::from_secs(3600));

    /// Creates a policy from a Duration.
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Creates a policy from seconds, rejecting negative or non-numeric input.
    pub fn from_secs(ttl_seconds: f64) -> Result<Self> {
        Ok(Self::new(ttl_from_secs(ttl_seconds)?))
    }

    /// The TTL applied to stored results.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<V: Clone> TtlCache<V> {
    // == Get Or Try Insert With ==
    /// Returns the cached value for `key`, or runs `fetch` and caches its result.
    ///
    /// `fetch` runs at most once per call and only on a miss. An error from it
    /// is returned exactly as produced and nothing is stored, so the next call
    /// tries again. Two concurrent misses on one key both run `fetch`; the
    /// later insert wins.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: &str,
        policy: CachePolicy,
        fetch: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        debug!(key, ttl_secs = policy.ttl().as_secs_f64(), "running underlying query");
        let value = match fetch().await {
            Ok(value) => value,
            Err(err) => {
                debug!(key, "underlying query failed; nothing cached");
                return Err(err);
            }
        };

        self.insert(key, value.clone(), policy.ttl());
        Ok(value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::error::CacheError;

    #[test]
    fn test_policy_from_secs() {
        assert_eq!(CachePolicy::from_secs(300.0).unwrap(), CachePolicy::VOLATILE);
        assert_eq!(CachePolicy::AGGREGATE.ttl(), Duration::from_secs(3600));
        assert!(matches!(
            CachePolicy::from_secs(-5.0),
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_miss_then_hit_runs_fetch_once() {
        let cache: TtlCache<u32> = TtlCache::new();
        let calls = &AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_try_insert_with("op:", CachePolicy::VOLATILE, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new();
        let calls = &AtomicUsize::new(0);

        let first = cache
            .get_or_try_insert_with("op:", CachePolicy::VOLATILE, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>("database timeout".to_string())
            })
            .await;
        assert_eq!(first, Err("database timeout".to_string()));
        assert!(cache.is_empty());

        let second = cache
            .get_or_try_insert_with("op:", CachePolicy::VOLATILE, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(7)
            })
            .await;
        assert_eq!(second, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_ttl() {
        let cache: TtlCache<u32> = TtlCache::new();
        let calls = &AtomicUsize::new(0);
        let policy = CachePolicy::from_secs(60.0).unwrap();

        let fetch = move || async move { Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst) as u32) };

        assert_eq!(cache.get_or_try_insert_with("k", policy, fetch).await, Ok(0));
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get_or_try_insert_with("k", policy, fetch).await, Ok(0));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get_or_try_insert_with("k", policy, fetch).await, Ok(1));
    }
}
