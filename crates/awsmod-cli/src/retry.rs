//! Retry envelope for individual AWS calls.
//!
//! Every remote call site wraps its request in [`call_with_retry`]. Retries
//! use exponential backoff with jitter and only happen for errors the policy
//! accepts: transient errors, plus any extra codes the call site names.

use crate::aws::error::AwsError;
use awsmod_common::defaults::{RETRY_MAX_DELAY, RETRY_MAX_TIMES, RETRY_MIN_DELAY};
use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Backoff policy and retry predicate for one call site.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub min_delay: Duration,
    /// Cap on any single delay
    pub max_delay: Duration,
    /// Maximum number of retries (not counting the first attempt)
    pub max_times: usize,
    /// Error codes retried in addition to transient errors
    pub extra_codes: &'static [&'static str],
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            min_delay: RETRY_MIN_DELAY,
            max_delay: RETRY_MAX_DELAY,
            max_times: RETRY_MAX_TIMES,
            extra_codes: &[],
        }
    }
}

impl RetryPolicy {
    /// Retry immediately, for tests
    pub fn immediate(max_times: usize) -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            max_times,
            extra_codes: &[],
        }
    }

    /// Same policy, also retrying on the given error codes
    pub fn with_extra_codes(mut self, codes: &'static [&'static str]) -> Self {
        self.extra_codes = codes;
        self
    }

    /// Decide whether an error is worth another attempt
    pub fn should_retry(&self, err: &AwsError) -> bool {
        err.is_retryable()
            || err
                .code()
                .is_some_and(|code| self.extra_codes.contains(&code))
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_factor(2.0)
            .with_max_times(self.max_times)
            .with_jitter()
    }
}

/// Run one remote call under the retry envelope.
///
/// # Arguments
/// * `policy` - Backoff and retry predicate
/// * `operation` - Name for logging (e.g. "ListBuckets")
/// * `call` - Builds and sends the request; called once per attempt
///
/// # Example
/// ```ignore
/// let output = call_with_retry(&policy, "GetBucketAcl", || async {
///     client.get_bucket_acl().bucket(name).send().await.map_err(|e| classify_sdk_error(&e))
/// })
/// .await?;
/// ```
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    call: F,
) -> Result<T, AwsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AwsError>>,
{
    call.retry(policy.backoff())
        .when(|e| policy.should_retry(e))
        .notify(|e, dur| {
            warn!(
                operation = %operation,
                delay = ?dur,
                error = %e,
                "Transient AWS error, retrying..."
            );
        })
        .await
}
