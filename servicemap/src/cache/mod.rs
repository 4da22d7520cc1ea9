//! Time-expiring memo used for the keyword dictionary and the layer schema.

mod stats;
mod ttl;

pub use stats::CacheStats;
pub use ttl::TtlCache;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lifetime of a cached dictionary or schema (one hour)
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a loaded value stays fresh
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL_SECS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
