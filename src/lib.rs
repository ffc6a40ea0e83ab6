//! Query Cache - in-process TTL cache for expensive read queries
//!
//! Canonical cache keys, per-entry expiry with lazy and background removal,
//! and a read-through helper for resolvers wrapping slow aggregations.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod resolvers;
pub mod tasks;

pub use api::AppState;
pub use cache::{build_key, CacheKeyBuilder, CachePolicy, CacheStats, TtlCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::Reaper;
