//! EFS tag reconciler

use crate::aws::operations::TagOperations;
use anyhow::{Context, Result};
use awsmod_common::{EfsTagParams, TagMap, TagOutput, TagState, reconcile};
use tracing::info;

async fn fetch_tags<T: TagOperations>(efs: &T, resource: &str) -> Result<TagMap> {
    efs.list_tags(resource)
        .await
        .with_context(|| format!("Failed to fetch tags for resource {resource}"))
}

/// Bring the tags of one EFS resource in line with `params`.
///
/// Removals are applied before additions. A failure in either call is fatal
/// and leaves whatever the earlier call changed in place. The reported
/// `tags` always come from a read issued after the modifications.
pub async fn run<T: TagOperations>(efs: &T, params: &EfsTagParams) -> Result<TagOutput> {
    params.check()?;
    let resource = params.resource.as_str();

    let current = fetch_tags(efs, resource).await?;
    let diff = reconcile(&current, &params.tags, params.state, params.purge_tags);

    if params.check_mode {
        info!(
            resource = %resource,
            add = diff.to_add.len(),
            remove = diff.to_remove.len(),
            "Check mode, not modifying tags"
        );
    } else {
        if !diff.to_remove.is_empty() {
            efs.untag_resource(resource, &diff.keys_to_remove())
                .await
                .with_context(|| {
                    format!(
                        "Failed to remove tags {:?} from resource {resource}",
                        diff.to_remove
                    )
                })?;
        }

        if params.state == TagState::Present && !diff.to_add.is_empty() {
            efs.tag_resource(resource, &diff.to_add)
                .await
                .with_context(|| {
                    format!("Failed to set tags {:?} on resource {resource}", diff.to_add)
                })?;
        }
    }

    let tags = fetch_tags(efs, resource).await?;
    Ok(TagOutput::new(diff, tags))
}
