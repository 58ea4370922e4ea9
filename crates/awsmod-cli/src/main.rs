//! awsmod: read S3 bucket configuration and reconcile EFS tags
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use anyhow::Result;
use awsmod_cli::aws::{AwsContext, EfsClient, FromAwsContext, S3Client};
use awsmod_cli::config::{AwsArgs, BucketInfoArgs, EfsTagArgs};
use awsmod_cli::{bucket_info, efs_tag, report};
use awsmod_common::{BucketInfoParams, EfsTagParams};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "awsmod")]
#[command(about = "Inspect S3 buckets and reconcile EFS tags")]
#[command(version)]
struct Args {
    #[command(flatten)]
    aws: AwsArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List S3 buckets and fetch their configuration
    S3BucketInfo(BucketInfoArgs),

    /// Add or remove tags on an EFS file system or access point
    EfsTag(EfsTagArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        let out = report::failure(&e);
        if let Err(print_err) = report::print_json(&out) {
            eprintln!("Error: {e:#} ({print_err})");
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Reduce noise from AWS SDK (show only warnings and errors)
        EnvFilter::new(format!(
            "{level},aws_config=warn,aws_sdk_s3=warn,aws_sdk_efs=warn,\
             aws_smithy_runtime=warn,aws_smithy_http=warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: Args) -> Result<()> {
    let aws = AwsContext::load(args.aws.region.as_deref(), args.aws.profile.as_deref()).await;
    debug!(aws = ?aws, "Loaded AWS configuration");

    match args.command {
        Command::S3BucketInfo(cmd) => {
            let params = BucketInfoParams::try_from(cmd)?;
            info!(
                name = %params.name,
                name_filter = %params.name_filter,
                details = ?params.bucket_facts.requested(),
                "Enumerating S3 buckets"
            );
            let s3 = S3Client::from_context(&aws);
            let out = bucket_info::run(&s3, &params).await?;
            report::print_json(&out)?;
        }

        Command::EfsTag(cmd) => {
            let params = EfsTagParams::try_from(cmd)?;
            info!(
                resource = %params.resource,
                state = %params.state,
                purge_tags = params.purge_tags,
                check_mode = params.check_mode,
                "Reconciling EFS tags"
            );
            let efs = EfsClient::from_context(&aws);
            let out = efs_tag::run(&efs, &params).await?;
            report::print_json(&out)?;
        }
    }

    Ok(())
}
