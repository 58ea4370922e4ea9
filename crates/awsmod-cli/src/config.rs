//! Command-line arguments and how they become parameter documents
//!
//! Each subcommand takes either `--params <file>` (a JSON document) or the
//! equivalent flags. Both paths produce the same params struct from
//! `awsmod_common`, which the operation validates before doing any work.

use awsmod_common::params::{load_params, parse_tag_arg};
use awsmod_common::{BucketDetail, BucketInfoParams, EfsTagParams, ParamsError, TagState};
use std::path::PathBuf;

/// AWS settings shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct AwsArgs {
    /// AWS region (default: from the SDK provider chain)
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS profile to use
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,
}

/// Arguments for the s3-bucket-info command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BucketInfoArgs {
    /// Read parameters from a JSON document instead of flags
    #[arg(long, conflicts_with_all = ["name", "name_filter", "fact", "transform_location"])]
    pub params: Option<PathBuf>,

    /// Only the bucket with exactly this name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Only buckets whose name contains this string
    #[arg(long, default_value = "", conflicts_with = "name")]
    pub name_filter: String,

    /// Detail to fetch for each bucket (e.g. bucket_acl); repeatable
    #[arg(long = "fact", value_name = "KIND")]
    pub fact: Vec<BucketDetail>,

    /// Report a null bucket location as us-east-1
    #[arg(long)]
    pub transform_location: bool,
}

impl TryFrom<BucketInfoArgs> for BucketInfoParams {
    type Error = ParamsError;

    fn try_from(args: BucketInfoArgs) -> Result<Self, Self::Error> {
        if let Some(path) = &args.params {
            return load_params(path);
        }
        Ok(Self {
            name: args.name,
            name_filter: args.name_filter,
            bucket_facts: args.fact.into_iter().collect(),
            transform_location: args.transform_location,
        })
    }
}

/// Arguments for the efs-tag command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EfsTagArgs {
    /// Read parameters from a JSON document instead of flags
    #[arg(long, conflicts_with_all = ["resource", "tag", "state", "purge_tags"])]
    pub params: Option<PathBuf>,

    /// File system ID or access point ID
    #[arg(long, required_unless_present = "params")]
    pub resource: Option<String>,

    /// Tag as KEY=VALUE, or bare KEY to match any value; repeatable
    #[arg(long = "tag", value_name = "KEY[=VALUE]", value_parser = parse_tag_arg)]
    pub tag: Vec<(String, Option<String>)>,

    /// Whether the tags should be present or absent
    #[arg(long, default_value_t = TagState::Present)]
    pub state: TagState,

    /// Remove tags not listed with --tag
    #[arg(long)]
    pub purge_tags: bool,

    /// Report changes without modifying the resource
    #[arg(long)]
    pub check: bool,
}

impl TryFrom<EfsTagArgs> for EfsTagParams {
    type Error = ParamsError;

    fn try_from(args: EfsTagArgs) -> Result<Self, Self::Error> {
        if let Some(path) = &args.params {
            let mut params: EfsTagParams = load_params(path)?;
            params.check_mode |= args.check;
            return Ok(params);
        }
        Ok(Self {
            resource: args.resource.unwrap_or_default(),
            tags: args.tag.into_iter().collect(),
            state: args.state,
            purge_tags: args.purge_tags,
            check_mode: args.check,
        })
    }
}
