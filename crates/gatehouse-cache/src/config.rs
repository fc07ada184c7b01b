//! Permission cache configuration.
//!
//! This module provides configuration for the in-process permission cache
//! loaded from environment variables.

use std::env;
use std::time::Duration;

/// Permission cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `PERMISSION_CACHE_TTL_SECONDS`: TTL backstop for cached entries
///   (default: `300`). Eviction is normally event-driven; the TTL only bounds
///   staleness if an invalidation event is lost.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Backstop time-to-live for cached entries.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let seconds = env::var("PERMISSION_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);
        Self {
            ttl: Duration::from_secs(seconds),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
        }
    }
}
