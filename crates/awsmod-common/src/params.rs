//! Parameter documents for the two operations
//!
//! Parameters arrive either as a JSON document or as CLI flags; both end up in
//! these structs and go through the same validation.

use crate::bucket::{BucketFacts, BucketFilter};
use crate::defaults::default_tag_state;
use crate::error::ParamsError;
use crate::tags::{DesiredTags, TagState};
use garde::Validate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters of the bucket enumerator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BucketInfoParams {
    /// Only the bucket with exactly this name
    pub name: String,
    /// Only buckets whose name contains this string
    pub name_filter: String,
    /// Details to fetch for every listed bucket
    pub bucket_facts: BucketFacts,
    /// Report the default region instead of a null location constraint
    pub transform_location: bool,
}

impl BucketInfoParams {
    /// Check cross-field constraints
    pub fn check(&self) -> Result<(), ParamsError> {
        if !self.name.is_empty() && !self.name_filter.is_empty() {
            return Err(ParamsError::MutuallyExclusive);
        }
        Ok(())
    }

    pub fn filter(&self) -> BucketFilter {
        BucketFilter::from_params(&self.name, &self.name_filter)
    }
}

/// Parameters of the EFS tag reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct EfsTagParams {
    /// File system ID or access point ID
    #[garde(length(min = 1))]
    pub resource: String,

    /// Tags to add or remove; a null value matches any current value
    #[garde(custom(non_empty_keys))]
    pub tags: DesiredTags,

    #[serde(default = "default_tag_state")]
    #[garde(skip)]
    pub state: TagState,

    /// Remove tags that are not in `tags`
    #[serde(default)]
    #[garde(skip)]
    pub purge_tags: bool,

    /// Report what would change without modifying the resource
    #[serde(default)]
    #[garde(skip)]
    pub check_mode: bool,
}

impl EfsTagParams {
    /// Check declared field constraints
    pub fn check(&self) -> Result<(), ParamsError> {
        self.validate()?;
        Ok(())
    }
}

fn non_empty_keys(tags: &DesiredTags, _ctx: &()) -> garde::Result {
    if tags.keys().any(|key| key.is_empty()) {
        return Err(garde::Error::new("tag keys cannot be empty"));
    }
    Ok(())
}

/// Parse a `--tag` flag: `KEY=VALUE` sets a value, bare `KEY` means any value
pub fn parse_tag_arg(arg: &str) -> Result<(String, Option<String>), ParamsError> {
    let (key, value) = match arg.split_once('=') {
        Some((key, value)) => (key, Some(value.to_string())),
        None => (arg, None),
    };
    if key.is_empty() {
        return Err(ParamsError::InvalidTag(arg.to_string()));
    }
    Ok((key.to_string(), value))
}

/// Parse a parameter document from a JSON string
pub fn parse_params<T: DeserializeOwned>(content: &str) -> Result<T, ParamsError> {
    Ok(serde_json::from_str(content)?)
}

/// Load a parameter document from a JSON file
pub fn load_params<T: DeserializeOwned>(path: &Path) -> Result<T, ParamsError> {
    let content =
        fs::read_to_string(path).map_err(|e| ParamsError::io(path.display().to_string(), e))?;
    parse_params(&content)
}
