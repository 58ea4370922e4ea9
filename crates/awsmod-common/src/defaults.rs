//! Default values shared by the operations and the CLI
//!
//! These constants keep parameter defaults and retry tuning consistent
//! between the parameter documents and the AWS call sites.

use std::time::Duration;

/// Region S3 reports as a null `LocationConstraint`
pub const DEFAULT_S3_REGION: &str = "us-east-1";

/// Prefix of tag keys reserved by AWS; never purged
pub const RESERVED_TAG_PREFIX: &str = "aws:";

/// First delay of the retry envelope
pub const RETRY_MIN_DELAY: Duration = Duration::from_secs(3);

/// Cap on any single retry delay
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(120);

/// Maximum number of retries per remote call
pub const RETRY_MAX_TIMES: usize = 10;

/// Page size requested from EFS `ListTagsForResource`
pub const EFS_TAG_PAGE_SIZE: i32 = 100;

/// Message attached to a successful bucket listing
pub const BUCKET_INFO_MSG: &str = "Retrieved s3 info.";

// Serde default functions for parameter fields

/// Returns the default tag state
pub fn default_tag_state() -> crate::TagState {
    crate::TagState::Present
}
