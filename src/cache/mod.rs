//! Cache Module
//!
//! Provides the in-process TTL cache, canonical key construction and the
//! read-through helper resolvers use to wrap expensive queries.

mod entry;
mod key;
mod query;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use key::{build_key, build_key_from, CacheKeyBuilder, PAIR_DELIMITER};
pub use query::CachePolicy;
pub use stats::CacheStats;
pub use store::{ttl_from_secs, EvictionListener, TtlCache};
