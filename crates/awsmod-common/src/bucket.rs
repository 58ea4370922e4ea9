//! S3 bucket model, detail kinds, and name filtering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One optional, independently fetched piece of bucket configuration.
///
/// Each variant maps to exactly one S3 `Get*` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BucketDetail {
    AccelerateConfiguration,
    Acl,
    Cors,
    Encryption,
    LifecycleConfiguration,
    Location,
    Logging,
    NotificationConfiguration,
    OwnershipControls,
    Policy,
    PolicyStatus,
    Replication,
    RequestPayment,
    Tagging,
    Website,
    PublicAccessBlock,
}

impl BucketDetail {
    /// All detail kinds, in the order they are fetched
    pub const ALL: [BucketDetail; 16] = [
        BucketDetail::AccelerateConfiguration,
        BucketDetail::Acl,
        BucketDetail::Cors,
        BucketDetail::Encryption,
        BucketDetail::LifecycleConfiguration,
        BucketDetail::Location,
        BucketDetail::Logging,
        BucketDetail::NotificationConfiguration,
        BucketDetail::OwnershipControls,
        BucketDetail::Policy,
        BucketDetail::PolicyStatus,
        BucketDetail::Replication,
        BucketDetail::RequestPayment,
        BucketDetail::Tagging,
        BucketDetail::Website,
        BucketDetail::PublicAccessBlock,
    ];

    /// Key under which the detail is stored on a bucket
    pub fn as_str(self) -> &'static str {
        match self {
            BucketDetail::AccelerateConfiguration => "bucket_accelerate_configuration",
            BucketDetail::Acl => "bucket_acl",
            BucketDetail::Cors => "bucket_cors",
            BucketDetail::Encryption => "bucket_encryption",
            BucketDetail::LifecycleConfiguration => "bucket_lifecycle_configuration",
            BucketDetail::Location => "bucket_location",
            BucketDetail::Logging => "bucket_logging",
            BucketDetail::NotificationConfiguration => "bucket_notification_configuration",
            BucketDetail::OwnershipControls => "bucket_ownership_controls",
            BucketDetail::Policy => "bucket_policy",
            BucketDetail::PolicyStatus => "bucket_policy_status",
            BucketDetail::Replication => "bucket_replication",
            BucketDetail::RequestPayment => "bucket_request_payment",
            BucketDetail::Tagging => "bucket_tagging",
            BucketDetail::Website => "bucket_website",
            BucketDetail::PublicAccessBlock => "public_access_block",
        }
    }

    /// Name of the S3 API operation backing this detail
    pub fn operation_name(self) -> &'static str {
        match self {
            BucketDetail::AccelerateConfiguration => "GetBucketAccelerateConfiguration",
            BucketDetail::Acl => "GetBucketAcl",
            BucketDetail::Cors => "GetBucketCors",
            BucketDetail::Encryption => "GetBucketEncryption",
            BucketDetail::LifecycleConfiguration => "GetBucketLifecycleConfiguration",
            BucketDetail::Location => "GetBucketLocation",
            BucketDetail::Logging => "GetBucketLogging",
            BucketDetail::NotificationConfiguration => "GetBucketNotificationConfiguration",
            BucketDetail::OwnershipControls => "GetBucketOwnershipControls",
            BucketDetail::Policy => "GetBucketPolicy",
            BucketDetail::PolicyStatus => "GetBucketPolicyStatus",
            BucketDetail::Replication => "GetBucketReplication",
            BucketDetail::RequestPayment => "GetBucketRequestPayment",
            BucketDetail::Tagging => "GetBucketTagging",
            BucketDetail::Website => "GetBucketWebsite",
            BucketDetail::PublicAccessBlock => "GetPublicAccessBlock",
        }
    }
}

impl fmt::Display for BucketDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketDetail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BucketDetail::ALL
            .into_iter()
            .find(|detail| detail.as_str() == s)
            .ok_or_else(|| format!("unknown bucket fact: {s}"))
    }
}

/// Per-detail toggles, as accepted in the `bucket_facts` parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BucketFacts {
    pub bucket_accelerate_configuration: bool,
    pub bucket_acl: bool,
    pub bucket_cors: bool,
    pub bucket_encryption: bool,
    pub bucket_lifecycle_configuration: bool,
    pub bucket_location: bool,
    pub bucket_logging: bool,
    pub bucket_notification_configuration: bool,
    pub bucket_ownership_controls: bool,
    pub bucket_policy: bool,
    pub bucket_policy_status: bool,
    pub bucket_replication: bool,
    pub bucket_request_payment: bool,
    pub bucket_tagging: bool,
    pub bucket_website: bool,
    pub public_access_block: bool,
}

impl BucketFacts {
    /// Check whether a detail kind is toggled on
    pub fn is_requested(&self, detail: BucketDetail) -> bool {
        match detail {
            BucketDetail::AccelerateConfiguration => self.bucket_accelerate_configuration,
            BucketDetail::Acl => self.bucket_acl,
            BucketDetail::Cors => self.bucket_cors,
            BucketDetail::Encryption => self.bucket_encryption,
            BucketDetail::LifecycleConfiguration => self.bucket_lifecycle_configuration,
            BucketDetail::Location => self.bucket_location,
            BucketDetail::Logging => self.bucket_logging,
            BucketDetail::NotificationConfiguration => self.bucket_notification_configuration,
            BucketDetail::OwnershipControls => self.bucket_ownership_controls,
            BucketDetail::Policy => self.bucket_policy,
            BucketDetail::PolicyStatus => self.bucket_policy_status,
            BucketDetail::Replication => self.bucket_replication,
            BucketDetail::RequestPayment => self.bucket_request_payment,
            BucketDetail::Tagging => self.bucket_tagging,
            BucketDetail::Website => self.bucket_website,
            BucketDetail::PublicAccessBlock => self.public_access_block,
        }
    }

    /// Toggle a detail kind on
    pub fn request(&mut self, detail: BucketDetail) {
        let flag = match detail {
            BucketDetail::AccelerateConfiguration => &mut self.bucket_accelerate_configuration,
            BucketDetail::Acl => &mut self.bucket_acl,
            BucketDetail::Cors => &mut self.bucket_cors,
            BucketDetail::Encryption => &mut self.bucket_encryption,
            BucketDetail::LifecycleConfiguration => &mut self.bucket_lifecycle_configuration,
            BucketDetail::Location => &mut self.bucket_location,
            BucketDetail::Logging => &mut self.bucket_logging,
            BucketDetail::NotificationConfiguration => {
                &mut self.bucket_notification_configuration
            }
            BucketDetail::OwnershipControls => &mut self.bucket_ownership_controls,
            BucketDetail::Policy => &mut self.bucket_policy,
            BucketDetail::PolicyStatus => &mut self.bucket_policy_status,
            BucketDetail::Replication => &mut self.bucket_replication,
            BucketDetail::RequestPayment => &mut self.bucket_request_payment,
            BucketDetail::Tagging => &mut self.bucket_tagging,
            BucketDetail::Website => &mut self.bucket_website,
            BucketDetail::PublicAccessBlock => &mut self.public_access_block,
        };
        *flag = true;
    }

    /// Requested detail kinds, in fetch order
    pub fn requested(&self) -> Vec<BucketDetail> {
        BucketDetail::ALL
            .into_iter()
            .filter(|detail| self.is_requested(*detail))
            .collect()
    }
}

impl FromIterator<BucketDetail> for BucketFacts {
    fn from_iter<I: IntoIterator<Item = BucketDetail>>(iter: I) -> Self {
        let mut facts = BucketFacts::default();
        for detail in iter {
            facts.request(detail);
        }
        facts
    }
}

/// An S3 bucket with any details fetched for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub name: String,
    pub creation_date: Option<DateTime<Utc>>,
    /// Fetched details keyed by [`BucketDetail::as_str`]
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl Bucket {
    pub fn new(name: impl Into<String>, creation_date: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            creation_date,
            details: BTreeMap::new(),
        }
    }

    /// Store a fetched detail
    pub fn set_detail(&mut self, detail: BucketDetail, value: Value) {
        self.details.insert(detail.as_str().to_string(), value);
    }

    /// Get a fetched detail, if present
    pub fn detail(&self, detail: BucketDetail) -> Option<&Value> {
        self.details.get(detail.as_str())
    }
}

/// Which buckets to keep from a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketFilter {
    All,
    /// Keep only the bucket with exactly this name
    Exact(String),
    /// Keep buckets whose name contains this string
    Contains(String),
}

impl BucketFilter {
    /// Build a filter from the `name` and `name_filter` parameters.
    ///
    /// Empty strings mean "not set". Exclusivity is checked during parameter
    /// validation; if both are set, `name_filter` wins.
    pub fn from_params(name: &str, name_filter: &str) -> Self {
        if !name_filter.is_empty() {
            BucketFilter::Contains(name_filter.to_string())
        } else if !name.is_empty() {
            BucketFilter::Exact(name.to_string())
        } else {
            BucketFilter::All
        }
    }

    pub fn matches(&self, bucket_name: &str) -> bool {
        match self {
            BucketFilter::All => true,
            BucketFilter::Exact(name) => bucket_name == name,
            BucketFilter::Contains(fragment) => bucket_name.contains(fragment.as_str()),
        }
    }

    /// Keep the matching buckets, preserving listing order
    pub fn apply(&self, buckets: Vec<Bucket>) -> Vec<Bucket> {
        buckets
            .into_iter()
            .filter(|bucket| self.matches(&bucket.name))
            .collect()
    }
}
