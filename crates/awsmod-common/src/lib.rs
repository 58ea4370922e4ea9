//! awsmod-common - Shared types and reconciliation logic
//!
//! This crate holds the parts of the S3 and EFS operations that do not talk
//! to AWS, without any AWS SDK dependencies to keep it lightweight.
//!
//! ## Modules
//!
//! - [`bucket`]: Bucket model, the 16 detail kinds, and name filtering
//! - [`defaults`]: Default values and retry tuning
//! - [`error`]: Parameter validation errors
//! - [`output`]: Result documents
//! - [`params`]: Parameter documents
//! - [`tags`]: Tag sets and the tag reconciliation algorithm

pub mod bucket;
pub mod defaults;
pub mod error;
pub mod output;
pub mod params;
pub mod tags;

// Re-export commonly used types
pub use bucket::{Bucket, BucketDetail, BucketFacts, BucketFilter};
pub use error::ParamsError;
pub use output::{BucketInfoOutput, FailureOutput, TagOutput};
pub use params::{BucketInfoParams, EfsTagParams};
pub use tags::{DesiredTags, TagDiff, TagMap, TagState, reconcile};
