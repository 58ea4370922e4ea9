//! AWS test utilities
//!
//! Region detection, unique names for throwaway resources, and the EFS
//! resource the tag tests run against.

use chrono::Utc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Environment variable naming an EFS file system or access point that tag
/// integration tests may modify
pub const EFS_RESOURCE_ENV: &str = "AWSMOD_TEST_EFS_RESOURCE";

/// Get the AWS region for tests.
///
/// Checks `AWS_REGION`, then `AWS_DEFAULT_REGION`, then falls back to
/// us-east-1.
pub fn get_test_region() -> String {
    region_from(
        std::env::var("AWS_REGION").ok(),
        std::env::var("AWS_DEFAULT_REGION").ok(),
    )
}

fn region_from(region: Option<String>, default_region: Option<String>) -> String {
    region
        .or(default_region)
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "us-east-1".to_string())
}

/// Generate a unique run ID for test resources.
///
/// Format: `test-{timestamp_ms}-{counter}`, unique within the process even
/// when tests start in the same millisecond.
///
/// # Example
///
/// ```
/// use awsmod_test_utils::aws::test_run_id;
///
/// let run_id = test_run_id();
/// assert!(run_id.starts_with("test-"));
/// ```
pub fn test_run_id() -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let ts = Utc::now().timestamp_millis();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("test-{ts}-{counter}")
}

/// Generate a unique, valid S3 bucket name.
///
/// ```
/// use awsmod_test_utils::aws::test_bucket_name;
///
/// assert!(test_bucket_name().starts_with("awsmod-test-"));
/// ```
pub fn test_bucket_name() -> String {
    format!("awsmod-{}", test_run_id())
}

/// EFS resource ID for tag tests, if one was provided
pub fn test_efs_resource() -> Option<String> {
    std::env::var(EFS_RESOURCE_ENV)
        .ok()
        .filter(|r| !r.is_empty())
}
