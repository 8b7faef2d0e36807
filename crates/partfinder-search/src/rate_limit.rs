//! Retry with exponential backoff for provider calls.
//!
//! Only transient failures are retried. Everything else, including API-level
//! errors in a 2xx payload, is returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::SearchError;

/// Retriable: [`SearchError::RateLimited`], [`SearchError::Http`], and 5xx
/// [`SearchError::UnexpectedStatus`].
fn is_retriable(err: &SearchError) -> bool {
    match err {
        SearchError::RateLimited { .. } | SearchError::Http(_) => true,
        SearchError::UnexpectedStatus { status, .. } => *status >= 500,
        SearchError::Provider(_)
        | SearchError::Deserialize { .. }
        | SearchError::NotConfigured
        | SearchError::InvalidBaseUrl { .. } => false,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries` extra
/// times.
///
/// The sleep before the n-th retry is `backoff_base_secs * 2^(n-1)` seconds.
/// With `max_retries = 0` the operation runs exactly once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient search provider error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
