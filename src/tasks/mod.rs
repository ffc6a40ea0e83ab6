//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Reaper: sweeps expired entries out of a `TtlCache` at a fixed interval

mod reaper;

pub use reaper::Reaper;
