//! S3 bucket listing and per-bucket detail lookups

mod details;

use crate::aws::context::{AwsContext, FromAwsContext};
use crate::aws::error::{AwsError, classify_sdk_error};
use crate::retry::{RetryPolicy, call_with_retry};
use awsmod_common::defaults::DEFAULT_S3_REGION;
use awsmod_common::{Bucket, BucketDetail};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::operation::get_bucket_location::GetBucketLocationOutput;
use chrono::DateTime;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Codes retried on detail lookups on top of transient errors.
///
/// Both show up briefly right after a bucket is created or deleted.
pub const DETAIL_RETRY_CODES: &[&str] = &["NoSuchBucket", "OperationAborted"];

/// Region a bucket lives in, given its location constraint.
///
/// Buckets in us-east-1 report no constraint (or an empty one), and old
/// buckets in eu-west-1 still report the legacy `EU` value.
pub fn region_for_constraint(constraint: Option<&str>) -> &str {
    match constraint {
        None | Some("") => DEFAULT_S3_REGION,
        Some("EU") => "eu-west-1",
        Some(region) => region,
    }
}

/// S3 client for reading bucket configuration.
///
/// Detail calls are sent to the region holding each bucket. The region is
/// looked up once per bucket with GetBucketLocation, which any regional
/// endpoint answers, and one SDK client is kept per region.
pub struct S3Client {
    client: Client,
    list_policy: RetryPolicy,
    detail_policy: RetryPolicy,
    bucket_regions: Mutex<HashMap<String, String>>,
    regional_clients: Mutex<HashMap<String, Client>>,
}

impl FromAwsContext for S3Client {
    fn from_context(ctx: &AwsContext) -> Self {
        Self::new(ctx.s3_client(), RetryPolicy::default())
    }
}

impl S3Client {
    /// Wrap an SDK client, deriving the detail policy from `policy`
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self {
            client,
            detail_policy: policy.clone().with_extra_codes(DETAIL_RETRY_CODES),
            list_policy: policy,
            bucket_regions: Mutex::new(HashMap::new()),
            regional_clients: Mutex::new(HashMap::new()),
        }
    }

    fn home_region(&self) -> &str {
        self.client
            .config()
            .region()
            .map_or(DEFAULT_S3_REGION, |region| region.as_ref())
    }

    /// List all buckets, following continuation tokens
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>, AwsError> {
        let mut buckets = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let token = continuation_token.clone();
            let response = call_with_retry(&self.list_policy, "ListBuckets", || async {
                self.client
                    .list_buckets()
                    .set_continuation_token(token.clone())
                    .send()
                    .await
                    .map_err(|e| classify_sdk_error(&e))
            })
            .await?;

            for bucket in response.buckets() {
                let Some(name) = bucket.name() else {
                    continue;
                };
                let creation_date = bucket
                    .creation_date()
                    .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()));
                buckets.push(Bucket::new(name, creation_date));
            }

            match response.continuation_token() {
                Some(token) if !token.is_empty() => continuation_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(count = buckets.len(), "Listed S3 buckets");
        Ok(buckets)
    }

    async fn fetch<T, F, Fut>(&self, detail: BucketDetail, call: F) -> Result<T, AwsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AwsError>>,
    {
        call_with_retry(&self.detail_policy, detail.operation_name(), call).await
    }

    /// GetBucketLocation through the home client, remembering the region
    async fn get_location(&self, bucket: &str) -> Result<GetBucketLocationOutput, AwsError> {
        let out = self
            .fetch(BucketDetail::Location, || async {
                self.client
                    .get_bucket_location()
                    .bucket(bucket)
                    .send()
                    .await
                    .map_err(|e| classify_sdk_error(&e))
            })
            .await?;

        let region = region_for_constraint(out.location_constraint().map(|c| c.as_str()));
        self.remember_region(bucket, region);
        Ok(out)
    }

    fn remember_region(&self, bucket: &str, region: &str) {
        self.bucket_regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(bucket.to_string(), region.to_string());
    }

    /// Client for the region holding `bucket`.
    ///
    /// When the location itself can't be read the home client is used, so a
    /// bucket in the home region still gets its details.
    async fn client_for(&self, bucket: &str) -> Result<Client, AwsError> {
        let cached = self
            .bucket_regions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(bucket)
            .cloned();

        let region = match cached {
            Some(region) => region,
            None => match self.get_location(bucket).await {
                Ok(out) => {
                    region_for_constraint(out.location_constraint().map(|c| c.as_str()))
                        .to_string()
                }
                Err(e) if e.is_connection() => return Err(e),
                Err(e) => {
                    debug!(
                        bucket = %bucket,
                        error = %e,
                        "Bucket region unknown, using home region"
                    );
                    let home = self.home_region().to_string();
                    self.remember_region(bucket, &home);
                    home
                }
            },
        };

        Ok(self.regional_client(&region))
    }

    fn regional_client(&self, region: &str) -> Client {
        if region == self.home_region() {
            return self.client.clone();
        }

        self.regional_clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(region.to_string())
            .or_insert_with(|| {
                debug!(region = %region, "Creating regional S3 client");
                let config = self
                    .client
                    .config()
                    .to_builder()
                    .region(Region::new(region.to_string()))
                    .build();
                Client::from_conf(config)
            })
            .clone()
    }

    /// Fetch one detail of a bucket, shaped as a JSON document
    pub async fn get_detail(&self, bucket: &str, detail: BucketDetail) -> Result<Value, AwsError> {
        debug!(bucket = %bucket, detail = %detail, "Fetching bucket detail");
        let client = match detail {
            BucketDetail::Location => self.client.clone(),
            _ => self.client_for(bucket).await?,
        };
        let client = &client;

        let value = match detail {
            BucketDetail::AccelerateConfiguration => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_accelerate_configuration()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::accelerate_configuration(&out)
            }
            BucketDetail::Acl => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_acl()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::acl(&out)
            }
            BucketDetail::Cors => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_cors()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::cors(&out)
            }
            BucketDetail::Encryption => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_encryption()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::encryption(&out)
            }
            BucketDetail::LifecycleConfiguration => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_lifecycle_configuration()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::lifecycle_configuration(&out)
            }
            BucketDetail::Location => details::location(&self.get_location(bucket).await?),
            BucketDetail::Logging => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_logging()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::logging(&out)
            }
            BucketDetail::NotificationConfiguration => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_notification_configuration()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::notification_configuration(&out)
            }
            BucketDetail::OwnershipControls => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_ownership_controls()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::ownership_controls(&out)
            }
            BucketDetail::Policy => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_policy()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::policy(&out)
            }
            BucketDetail::PolicyStatus => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_policy_status()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::policy_status(&out)
            }
            BucketDetail::Replication => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_replication()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::replication(&out)
            }
            BucketDetail::RequestPayment => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_request_payment()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::request_payment(&out)
            }
            BucketDetail::Tagging => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_tagging()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::tagging(&out)
            }
            BucketDetail::Website => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_bucket_website()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::website(&out)
            }
            BucketDetail::PublicAccessBlock => {
                let out = self
                    .fetch(detail, || async {
                        client
                            .get_public_access_block()
                            .bucket(bucket)
                            .send()
                            .await
                            .map_err(|e| classify_sdk_error(&e))
                    })
                    .await?;
                details::public_access_block(&out)
            }
        };

        Ok(value)
    }
}
