//! Result documents printed by the operations

use crate::bucket::Bucket;
use crate::defaults::BUCKET_INFO_MSG;
use crate::tags::{TagDiff, TagMap};
use serde::Serialize;

/// Result of the bucket enumerator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketInfoOutput {
    pub changed: bool,
    pub msg: String,
    pub buckets: Vec<Bucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name_filter: Option<String>,
}

impl BucketInfoOutput {
    /// Build the result, echoing whichever of `name`/`name_filter` was set
    pub fn new(buckets: Vec<Bucket>, name: &str, name_filter: &str) -> Self {
        let (bucket_name, bucket_name_filter) = if !name.is_empty() {
            (Some(name.to_string()), None)
        } else if !name_filter.is_empty() {
            (None, Some(name_filter.to_string()))
        } else {
            (None, None)
        };
        Self {
            changed: false,
            msg: BUCKET_INFO_MSG.to_string(),
            buckets,
            bucket_name,
            bucket_name_filter,
        }
    }
}

/// Result of the tag reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOutput {
    pub changed: bool,
    /// Tags read back from the resource after any modification
    pub tags: TagMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_tags: Option<TagMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_tags: Option<TagMap>,
}

impl TagOutput {
    pub fn new(diff: TagDiff, tags: TagMap) -> Self {
        let changed = !diff.is_empty();
        let added_tags = (!diff.to_add.is_empty()).then_some(diff.to_add);
        let removed_tags = (!diff.to_remove.is_empty()).then_some(diff.to_remove);
        Self {
            changed,
            tags,
            added_tags,
            removed_tags,
        }
    }
}

/// Document printed when an operation fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureOutput {
    pub failed: bool,
    pub msg: String,
    /// Underlying causes, outermost first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cause: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl FailureOutput {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            failed: true,
            msg: msg.into(),
            cause: Vec::new(),
            error_code: None,
            suggestion: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_info_echoes_name() {
        let out = BucketInfoOutput::new(Vec::new(), "foo", "");
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["bucket_name"], "foo");
        assert!(value.get("bucket_name_filter").is_none());
        assert_eq!(value["msg"], "Retrieved s3 info.");
        assert_eq!(value["buckets"], json!([]));
    }

    #[test]
    fn test_bucket_info_echoes_filter() {
        let out = BucketInfoOutput::new(Vec::new(), "", "foo");
        let value = serde_json::to_value(&out).unwrap();
        assert!(value.get("bucket_name").is_none());
        assert_eq!(value["bucket_name_filter"], "foo");
    }

    #[test]
    fn test_tag_output_omits_empty_sets() {
        let mut tags = TagMap::new();
        tags.insert("Name".to_string(), "x".to_string());

        let out = TagOutput::new(TagDiff::default(), tags);
        assert!(!out.changed);
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value, json!({"changed": false, "tags": {"Name": "x"}}));
    }

    #[test]
    fn test_tag_output_reports_changes() {
        let mut diff = TagDiff::default();
        diff.to_remove.insert("Env".to_string(), "dev".to_string());

        let out = TagOutput::new(diff, TagMap::new());
        assert!(out.changed);
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["removed_tags"], json!({"Env": "dev"}));
        assert!(value.get("added_tags").is_none());
    }

    #[test]
    fn test_failure_output_shape() {
        let mut out = FailureOutput::new("Failed to list buckets");
        out.cause.push("AWS error: Access Denied".to_string());
        out.error_code = Some("AccessDenied".to_string());

        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["failed"], true);
        assert_eq!(value["error_code"], "AccessDenied");
        assert!(value.get("suggestion").is_none());
    }
}
