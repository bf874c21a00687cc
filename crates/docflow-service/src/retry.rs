//! Retry loop for read-modify-write cycles that lose an optimistic
//! concurrency race.

use std::fmt::Display;
use std::future::Future;

use tracing::warn;

use docflow_core::config::ConsistencyConfig;
use docflow_core::result::AppResult;

/// Runs `operation` until it succeeds, fails with something other than a
/// conflict, or `policy.max_retries` retries are used up.
///
/// `operation` must re-read whatever it writes on every call; the loop only
/// waits and calls it again.
pub async fn retry_on_conflict<T, F, Fut>(
    policy: &ConsistencyConfig,
    target: impl Display,
    mut operation: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Err(err) if err.is_conflict() && attempt < policy.max_retries => {
                attempt += 1;
                let backoff = policy.backoff_for(attempt);
                warn!(
                    target_aggregate = %target,
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "Concurrent modification, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            other => return other,
        }
    }
}
