//! Aggregate consistency maintenance configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry policy for the recompute-and-save cycle run by aggregate
/// maintenance handlers when a save hits a stale revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyConfig {
    /// Number of retries after the first attempt before the conflict is
    /// surfaced to the publisher.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base backoff in milliseconds; attempt `n` waits `n * base`.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl ConsistencyConfig {
    /// Backoff to wait before the given retry attempt (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    10
}
