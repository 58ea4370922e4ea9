//! Shared test utilities for awsmod
//!
//! Helpers for the `#[ignore]`d integration tests that talk to a real AWS
//! account.

pub mod aws;

pub use aws::{get_test_region, test_bucket_name, test_efs_resource, test_run_id};
