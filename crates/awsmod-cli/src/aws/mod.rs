//! AWS client modules
//!
//! Thin wrappers around the SDK clients:
//! - S3: bucket listing and per-bucket configuration lookups
//! - EFS: tag reads and writes on file systems and access points
//!
//! Everything above this layer goes through the traits in [`operations`].

pub mod context;
pub mod efs;
pub mod error;
pub mod operations;
pub mod s3;

pub use context::{AwsContext, FromAwsContext};
pub use efs::EfsClient;
pub use error::{AwsError, ErrorKind, classify_aws_error, classify_sdk_error, find_aws_error};
pub use operations::{BucketOperations, TagOperations};
pub use s3::S3Client;
