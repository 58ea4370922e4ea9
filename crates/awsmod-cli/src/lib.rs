//! awsmod - S3 bucket enumeration and EFS tag reconciliation
//!
//! This crate provides the `awsmod` binary and the library behind it: AWS
//! client wrappers, the two operations, and argument handling.

pub mod aws;
pub mod bucket_info;
pub mod config;
pub mod efs_tag;
pub mod report;
pub mod retry;

#[cfg(test)]
mod testing;
