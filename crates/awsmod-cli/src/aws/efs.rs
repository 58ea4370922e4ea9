//! EFS resource tagging
//!
//! Works for both file systems (`fs-...`) and access points (`fsap-...`);
//! the tagging API takes either ID as the resource.

use crate::aws::context::{AwsContext, FromAwsContext};
use crate::aws::error::{AwsError, classify_sdk_error};
use crate::retry::{RetryPolicy, call_with_retry};
use awsmod_common::TagMap;
use awsmod_common::defaults::EFS_TAG_PAGE_SIZE;
use aws_sdk_efs::Client;
use aws_sdk_efs::types::Tag;
use tracing::{debug, info};

/// EFS client for reading and writing resource tags
pub struct EfsClient {
    client: Client,
    policy: RetryPolicy,
}

impl FromAwsContext for EfsClient {
    fn from_context(ctx: &AwsContext) -> Self {
        Self::new(ctx.efs_client(), RetryPolicy::default())
    }
}

impl EfsClient {
    pub fn new(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Read every tag on a resource, following pagination
    pub async fn list_tags(&self, resource: &str) -> Result<TagMap, AwsError> {
        let mut tags = TagMap::new();
        let mut next_token: Option<String> = None;

        loop {
            let token = next_token.clone();
            let response = call_with_retry(&self.policy, "ListTagsForResource", || async {
                self.client
                    .list_tags_for_resource()
                    .resource_id(resource)
                    .max_results(EFS_TAG_PAGE_SIZE)
                    .set_next_token(token.clone())
                    .send()
                    .await
                    .map_err(|e| classify_sdk_error(&e))
            })
            .await?;

            for tag in response.tags() {
                tags.insert(tag.key().to_string(), tag.value().to_string());
            }

            match response.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        debug!(resource = %resource, count = tags.len(), "Fetched EFS tags");
        Ok(tags)
    }

    /// Create or overwrite tags on a resource
    pub async fn tag_resource(&self, resource: &str, tags: &TagMap) -> Result<(), AwsError> {
        let tags = tags
            .iter()
            .map(|(key, value)| {
                Tag::builder()
                    .key(key)
                    .value(value)
                    .build()
                    .map_err(|e| AwsError::Sdk {
                        code: None,
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        info!(resource = %resource, count = tags.len(), "Tagging EFS resource");
        call_with_retry(&self.policy, "TagResource", || async {
            self.client
                .tag_resource()
                .resource_id(resource)
                .set_tags(Some(tags.clone()))
                .send()
                .await
                .map_err(|e| classify_sdk_error(&e))
        })
        .await?;

        Ok(())
    }

    /// Remove tags from a resource by key
    pub async fn untag_resource(&self, resource: &str, keys: &[String]) -> Result<(), AwsError> {
        info!(resource = %resource, keys = ?keys, "Untagging EFS resource");
        call_with_retry(&self.policy, "UntagResource", || async {
            self.client
                .untag_resource()
                .resource_id(resource)
                .set_tag_keys(Some(keys.to_vec()))
                .send()
                .await
                .map_err(|e| classify_sdk_error(&e))
        })
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubHttp;

    fn tag_page(tags: &[(&str, &str)], next_token: Option<&str>) -> String {
        let tags: Vec<_> = tags
            .iter()
            .map(|(k, v)| serde_json::json!({ "Key": k, "Value": v }))
            .collect();
        let mut page = serde_json::json!({ "Tags": tags });
        if let Some(token) = next_token {
            page["NextToken"] = token.into();
        }
        page.to_string()
    }

    #[tokio::test]
    async fn test_list_tags_merges_pages() {
        let http = StubHttp::new(|uri| {
            let page = if uri.contains("NextToken=page2") {
                tag_page(&[("Team", "storage")], None)
            } else {
                tag_page(&[("Name", "shared"), ("Env", "dev")], Some("page2"))
            };
            Some((200, page))
        });
        let efs = EfsClient::new(http.efs_client("us-east-1"), RetryPolicy::immediate(0));

        let tags = efs.list_tags("fs-0123456789abcdef0").await.unwrap();

        let expected: TagMap = [("Env", "dev"), ("Name", "shared"), ("Team", "storage")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(tags, expected);

        let uris = http.uris();
        assert_eq!(uris.len(), 2);
        assert!(uris[0].contains("resource-tags/fs-0123456789abcdef0"));
        assert!(uris[0].contains(&format!("MaxResults={EFS_TAG_PAGE_SIZE}")));
    }

    #[tokio::test]
    async fn test_missing_resource_is_not_found() {
        let http = StubHttp::new(|_| {
            let body = serde_json::json!({
                "__type": "FileSystemNotFound",
                "ErrorCode": "FileSystemNotFound",
                "Message": "no such file system",
            });
            Some((404, body.to_string()))
        });
        let efs = EfsClient::new(http.efs_client("us-east-1"), RetryPolicy::immediate(0));

        let err = efs.list_tags("fs-missing").await.unwrap_err();
        assert!(matches!(err, AwsError::NotFound { .. }));
        assert_eq!(err.code(), Some("FileSystemNotFound"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_error() {
        let http = StubHttp::new(|_| None);
        let efs = EfsClient::new(http.efs_client("us-east-1"), RetryPolicy::immediate(0));

        let err = efs.untag_resource("fs-1", &["Env".to_string()]).await.unwrap_err();
        assert!(err.is_connection(), "unexpected error: {err:?}");
    }
}
