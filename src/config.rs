//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default interval between reaper sweeps, in seconds.
pub const DEFAULT_REAPER_INTERVAL_SECS: u64 = 300;

/// Default HTTP port for the admin surface.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Cache and host configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// How often the background sweep runs, in seconds
    pub reaper_interval_seconds: u64,
    /// TTL used by `TtlCache::set_default`; unset means callers must pass a TTL
    pub default_ttl_seconds: Option<f64>,
    /// HTTP server port for the admin surface
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REAPER_INTERVAL_SECONDS` - Sweep frequency in seconds (default: 300)
    /// - `DEFAULT_TTL_SECONDS` - Fallback TTL in seconds (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            reaper_interval_seconds: env::var("REAPER_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REAPER_INTERVAL_SECS),
            default_ttl_seconds: env::var("DEFAULT_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    /// Sets the reaper interval.
    pub fn with_reaper_interval(mut self, seconds: u64) -> Self {
        self.reaper_interval_seconds = seconds;
        self
    }

    /// Sets the fallback TTL.
    pub fn with_default_ttl(mut self, seconds: f64) -> Self {
        self.default_ttl_seconds = Some(seconds);
        self
    }

    /// Rejects settings that would break the reaper or produce bogus TTLs.
    pub fn validate(&self) -> Result<()> {
        if self.reaper_interval_seconds == 0 {
            return Err(CacheError::invalid(
                "reaper_interval_seconds must be greater than zero",
            ));
        }
        if let Some(ttl) = self.default_ttl_seconds {
            if !ttl.is_finite() || ttl < 0.0 {
                return Err(CacheError::invalid(format!(
                    "default_ttl_seconds must be a non-negative number, got {}",
                    ttl
                )));
            }
        }
        Ok(())
    }

    /// Reaper interval as a Duration.
    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reaper_interval_seconds: DEFAULT_REAPER_INTERVAL_SECS,
            default_ttl_seconds: None,
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}
