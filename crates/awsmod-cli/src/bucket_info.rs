//! Bucket enumerator: list, filter, and enrich S3 buckets

use crate::aws::error::ErrorKind;
use crate::aws::operations::BucketOperations;
use anyhow::{Context, Result};
use awsmod_common::defaults::DEFAULT_S3_REGION;
use awsmod_common::{
    Bucket, BucketDetail, BucketFacts, BucketFilter, BucketInfoOutput, BucketInfoParams,
};
use serde_json::Value;
use tracing::{debug, info, warn};

/// List the buckets matching `filter`, in listing order
pub async fn list_buckets<S: BucketOperations>(
    s3: &S,
    filter: &BucketFilter,
) -> Result<Vec<Bucket>> {
    let buckets = s3.list_buckets().await.context("Failed to list buckets")?;
    let total = buckets.len();
    let buckets = filter.apply(buckets);
    debug!(total, matched = buckets.len(), "Filtered bucket listing");
    Ok(buckets)
}

/// Fetch the requested details for every bucket.
///
/// A detail that fails is left out of that bucket; the remaining details and
/// buckets are still fetched. Only an unreachable service aborts.
pub async fn enrich<S: BucketOperations>(
    s3: &S,
    mut buckets: Vec<Bucket>,
    facts: &BucketFacts,
    transform_location: bool,
) -> Result<Vec<Bucket>> {
    let requested = facts.requested();
    if requested.is_empty() {
        return Ok(buckets);
    }

    for bucket in &mut buckets {
        for &detail in &requested {
            let mut value = match s3.get_detail(&bucket.name, detail).await {
                Ok(value) => value,
                Err(e) if e.is_connection() => {
                    return Err(e).with_context(|| {
                        format!("Failed to fetch {} for bucket {}", detail, bucket.name)
                    });
                }
                Err(e) => {
                    match e.kind() {
                        ErrorKind::NotConfigured => {
                            debug!(
                                bucket = %bucket.name,
                                detail = %detail,
                                code = ?e.code(),
                                "Detail not configured"
                            );
                        }
                        _ => {
                            warn!(
                                bucket = %bucket.name,
                                detail = %detail,
                                error = %e,
                                "Skipping bucket detail"
                            );
                        }
                    }
                    continue;
                }
            };

            if detail == BucketDetail::Location && transform_location {
                default_location(&mut value);
            }
            bucket.set_detail(detail, value);
        }
    }

    Ok(buckets)
}

/// Report buckets in the default region as `us-east-1` instead of null
fn default_location(value: &mut Value) {
    let Some(doc) = value.as_object_mut() else {
        return;
    };
    let unset = match doc.get("LocationConstraint") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    };
    if unset {
        doc.insert(
            "LocationConstraint".to_string(),
            Value::String(DEFAULT_S3_REGION.to_string()),
        );
    }
}

/// Run the bucket enumerator end to end
pub async fn run<S: BucketOperations>(
    s3: &S,
    params: &BucketInfoParams,
) -> Result<BucketInfoOutput> {
    params.check()?;

    let buckets = list_buckets(s3, &params.filter()).await?;
    let buckets = enrich(s3, buckets, &params.bucket_facts, params.transform_location).await?;
    info!(count = buckets.len(), "Retrieved S3 bucket info");

    Ok(BucketInfoOutput::new(
        buckets,
        &params.name,
        &params.name_filter,
    ))
}
