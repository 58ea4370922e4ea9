//! Service operation traits for testing
//!
//! The bucket enumerator and the tag reconciler only talk to AWS through
//! these traits, so their logic can be unit tested against in-memory fakes.

use super::error::AwsError;
use super::{EfsClient, S3Client};
use awsmod_common::{Bucket, BucketDetail, TagMap};
use serde_json::Value;
use std::future::Future;

/// S3 calls used by the bucket enumerator.
pub trait BucketOperations: Send + Sync {
    /// List every bucket owned by the caller, in listing order
    fn list_buckets(&self) -> impl Future<Output = Result<Vec<Bucket>, AwsError>> + Send;

    /// Fetch one detail of one bucket
    fn get_detail(
        &self,
        bucket: &str,
        detail: BucketDetail,
    ) -> impl Future<Output = Result<Value, AwsError>> + Send;
}

/// Tag calls used by the EFS tag reconciler.
pub trait TagOperations: Send + Sync {
    /// Read all tags of a file system or access point
    fn list_tags(&self, resource: &str) -> impl Future<Output = Result<TagMap, AwsError>> + Send;

    /// Create or overwrite tags
    fn tag_resource(
        &self,
        resource: &str,
        tags: &TagMap,
    ) -> impl Future<Output = Result<(), AwsError>> + Send;

    /// Remove tags by key
    fn untag_resource(
        &self,
        resource: &str,
        keys: &[String],
    ) -> impl Future<Output = Result<(), AwsError>> + Send;
}

impl BucketOperations for S3Client {
    async fn list_buckets(&self) -> Result<Vec<Bucket>, AwsError> {
        S3Client::list_buckets(self).await
    }

    async fn get_detail(&self, bucket: &str, detail: BucketDetail) -> Result<Value, AwsError> {
        S3Client::get_detail(self, bucket, detail).await
    }
}

impl TagOperations for EfsClient {
    async fn list_tags(&self, resource: &str) -> Result<TagMap, AwsError> {
        EfsClient::list_tags(self, resource).await
    }

    async fn tag_resource(&self, resource: &str, tags: &TagMap) -> Result<(), AwsError> {
        EfsClient::tag_resource(self, resource, tags).await
    }

    async fn untag_resource(&self, resource: &str, keys: &[String]) -> Result<(), AwsError> {
        EfsClient::untag_resource(self, resource, keys).await
    }
}
