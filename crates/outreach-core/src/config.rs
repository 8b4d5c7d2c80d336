// ── Runtime console configuration ──
//
// Cache tuning and lead-search defaults. Never touches disk: the TUI
// builds a `ConsoleConfig` (usually via outreach-config) and hands it in.

use std::time::Duration;

/// Default number of scrape runs read from `linkedin/latest`.
pub const DEFAULT_LATEST_LIMIT: u32 = 10;

/// Query cache tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a successful fetch is served without going back to the backend.
    pub stale_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
        }
    }
}

/// Configuration for a [`Console`](crate::Console).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub cache: CacheConfig,
    /// `limit` passed to `linkedin/latest` by the leads view.
    pub latest_limit: u32,
    /// Result count requested per lead search. `None` lets the backend decide.
    pub default_search_count: Option<u32>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            latest_limit: DEFAULT_LATEST_LIMIT,
            default_search_count: None,
        }
    }
}
