//! AWS error classification and handling
//!
//! Provides typed errors for AWS SDK operations using the `.code()` method
//! instead of string matching on Debug format. Callers decide what to do by
//! matching on [`ErrorKind`].

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// How a failed remote call should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Worth retrying with backoff
    Transient,
    /// Surfaced immediately
    Permanent,
    /// The requested configuration does not exist on the resource
    NotConfigured,
}

/// AWS error categories for retry and failure isolation
#[derive(Debug, Clone, Error)]
pub enum AwsError {
    /// Bucket sub-resource is not configured (e.g. no CORS rules)
    #[error("Configuration not found: {code}")]
    NotConfigured { code: String, message: String },

    /// Resource does not exist
    #[error("Resource not found: {message}")]
    NotFound { code: String, message: String },

    /// Rate limit exceeded (retryable with backoff)
    #[error("Rate limit exceeded: {code}")]
    Throttled { code: String },

    /// Service-side failure (retryable with backoff)
    #[error("Service unavailable: {code}")]
    Unavailable { code: String },

    /// Request never got a response: dispatch failure or timeout
    #[error("Connection failed: {message}")]
    Connection { message: String },

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AwsError::NotConfigured { .. } => ErrorKind::NotConfigured,
            AwsError::Throttled { .. }
            | AwsError::Unavailable { .. }
            | AwsError::Connection { .. } => ErrorKind::Transient,
            AwsError::NotFound { .. } | AwsError::Sdk { .. } => ErrorKind::Permanent,
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Check if this is a "not configured" error
    pub fn is_not_configured(&self) -> bool {
        self.kind() == ErrorKind::NotConfigured
    }

    /// Check if the service never answered
    pub fn is_connection(&self) -> bool {
        matches!(self, AwsError::Connection { .. })
    }

    /// AWS error code, when the service returned one
    pub fn code(&self) -> Option<&str> {
        match self {
            AwsError::NotConfigured { code, .. }
            | AwsError::NotFound { code, .. }
            | AwsError::Throttled { code }
            | AwsError::Unavailable { code } => Some(code),
            AwsError::Sdk { code, .. } => code.as_deref(),
            AwsError::Connection { .. } => None,
        }
    }

    /// Get a user-friendly suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            AwsError::Connection { .. } => Some(
                "Check network connectivity and that the region is correct.".to_string(),
            ),
            _ => self.code().and_then(suggestion_for_code),
        }
    }
}

/// S3 error codes meaning a bucket sub-resource is not configured
const NOT_CONFIGURED_CODES: &[&str] = &[
    "NoSuchCORSConfiguration",
    "NoSuchLifecycleConfiguration",
    "NoSuchBucketPolicy",
    "NoSuchTagSet",
    "NoSuchWebsiteConfiguration",
    "NoSuchPublicAccessBlockConfiguration",
    "ServerSideEncryptionConfigurationNotFoundError",
    "ReplicationConfigurationNotFoundError",
    "OwnershipControlsNotFoundError",
];

/// Known AWS error codes for "not found" conditions
const NOT_FOUND_CODES: &[&str] = &[
    "NoSuchBucket",
    "FileSystemNotFound",
    "AccessPointNotFound",
];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
    "SlowDown",
];

/// Known AWS error codes for temporary service-side failures
const UNAVAILABLE_CODES: &[&str] = &[
    "ServiceUnavailable",
    "Unavailable",
    "InternalError",
    "InternalFailure",
    "InternalServerError",
    "RequestTimeout",
];

/// Classify an AWS error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_CONFIGURED_CODES.contains(&c) => AwsError::NotConfigured {
            code: c.to_string(),
            message,
        },
        Some(c) if NOT_FOUND_CODES.contains(&c) => AwsError::NotFound {
            code: c.to_string(),
            message,
        },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled {
            code: c.to_string(),
        },
        Some(c) if UNAVAILABLE_CODES.contains(&c) => AwsError::Unavailable {
            code: c.to_string(),
        },
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify an SDK error from any AWS service client.
///
/// Requests that never produced a response (dispatch failures, timeouts) are
/// classified as [`AwsError::Connection`]; everything else goes through
/// [`classify_aws_error`] using the error metadata.
pub fn classify_sdk_error<E, R>(err: &SdkError<E, R>) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => AwsError::Connection {
            message: DisplayErrorContext(err).to_string(),
        },
        _ => {
            let detail = DisplayErrorContext(err).to_string();
            classify_aws_error(err.code(), Some(err.message().unwrap_or(detail.as_str())))
        }
    }
}

/// Error code to user-friendly suggestion mapping
const SUGGESTIONS: &[(&str, &str)] = &[
    (
        "AccessDenied",
        "Check that the IAM policy grants this action on the resource.",
    ),
    (
        "AccessDeniedException",
        "Check that the IAM policy grants this action on the resource.",
    ),
    (
        "ExpiredToken",
        "Your session credentials have expired. Refresh them and retry.",
    ),
    (
        "InvalidAccessKeyId",
        "The access key is not recognised. Check AWS_PROFILE or AWS_ACCESS_KEY_ID.",
    ),
    (
        "SignatureDoesNotMatch",
        "The secret key does not match the access key. Check your credentials.",
    ),
    (
        "NoSuchBucket",
        "The bucket does not exist or was just deleted.",
    ),
    (
        "FileSystemNotFound",
        "Check the file system ID and the region.",
    ),
    (
        "AccessPointNotFound",
        "Check the access point ID and the region.",
    ),
    (
        "Throttling",
        "AWS API rate limit hit. The operation was retried but kept failing.",
    ),
    (
        "ThrottlingException",
        "AWS API rate limit hit. The operation was retried but kept failing.",
    ),
    (
        "RequestLimitExceeded",
        "AWS API rate limit hit. The operation was retried but kept failing.",
    ),
];

/// Get a user-friendly suggestion for a known error code.
fn suggestion_for_code(code: &str) -> Option<String> {
    SUGGESTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| (*s).to_string())
}

/// Find the first [`AwsError`] in an anyhow error chain.
pub fn find_aws_error(error: &anyhow::Error) -> Option<&AwsError> {
    error.chain().find_map(|cause| cause.downcast_ref::<AwsError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::list_buckets::ListBucketsError;
    use aws_smithy_runtime_api::client::result::ConnectorError;

    #[test]
    fn not_configured_codes() {
        for code in NOT_CONFIGURED_CODES {
            let err = classify_aws_error(Some(code), Some("some message"));
            assert_eq!(err.kind(), ErrorKind::NotConfigured, "code: {code}");
            assert!(err.is_not_configured());
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn not_found_codes() {
        for code in NOT_FOUND_CODES {
            let err = classify_aws_error(Some(code), Some("msg"));
            assert!(matches!(err, AwsError::NotFound { .. }), "code: {code}");
            assert_eq!(err.kind(), ErrorKind::Permanent);
        }
    }

    #[test]
    fn throttling_codes() {
        for code in THROTTLING_CODES {
            let err = classify_aws_error(Some(code), Some("msg"));
            assert!(err.is_retryable(), "Expected retryable for code: {code}");
            assert!(matches!(err, AwsError::Throttled { .. }));
        }
    }

    #[test]
    fn unavailable_codes() {
        for code in UNAVAILABLE_CODES {
            let err = classify_aws_error(Some(code), Some("msg"));
            assert!(err.is_retryable(), "Expected retryable for code: {code}");
            assert!(matches!(err, AwsError::Unavailable { .. }));
        }
    }

    #[test]
    fn unknown_and_missing_codes() {
        let err = classify_aws_error(Some("AccessDenied"), Some("Access Denied"));
        assert!(matches!(err, AwsError::Sdk { .. }));
        assert_eq!(err.kind(), ErrorKind::Permanent);
        assert_eq!(err.code(), Some("AccessDenied"));

        let err2 = classify_aws_error(None, None);
        assert!(matches!(err2, AwsError::Sdk { code: None, .. }));
        assert_eq!(err2.to_string(), "AWS error: Unknown error");
    }

    #[test]
    fn connection_errors_are_transient() {
        let err = AwsError::Connection {
            message: "dns error".to_string(),
        };
        assert!(err.is_retryable());
        assert!(err.is_connection());
        assert_eq!(err.code(), None);
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn suggestions_for_known_codes() {
        for (code, _) in SUGGESTIONS {
            assert!(
                suggestion_for_code(code).is_some(),
                "No suggestion for code: {code}"
            );
        }
        assert!(suggestion_for_code("SomeUnknownCode").is_none());

        let err = classify_aws_error(Some("ExpiredToken"), Some("expired"));
        assert!(err.suggestion().unwrap().contains("expired"));
    }

    #[test]
    fn find_aws_error_walks_context() {
        let err: anyhow::Result<()> = Err(AwsError::Throttled {
            code: "SlowDown".to_string(),
        })
        .context("Failed to list buckets");
        let err = err.unwrap_err();

        let found = find_aws_error(&err).expect("AwsError in chain");
        assert_eq!(found.code(), Some("SlowDown"));
        assert!(find_aws_error(&anyhow::anyhow!("plain")).is_none());
    }

    type ListBucketsSdkError = SdkError<ListBucketsError, ()>;

    #[test]
    fn classify_sdk_transport_failures() {
        let err: ListBucketsSdkError =
            SdkError::dispatch_failure(ConnectorError::io("connection refused".into()));
        assert!(matches!(classify_sdk_error(&err), AwsError::Connection { .. }));

        let err: ListBucketsSdkError = SdkError::timeout_error("operation timed out");
        let err = classify_sdk_error(&err);
        assert!(err.is_connection());
        assert!(err.is_retryable());
    }

    #[test]
    fn classify_sdk_service_error_by_code() {
        let meta = ErrorMetadata::builder()
            .code("SlowDown")
            .message("Please reduce your request rate.")
            .build();
        let err: ListBucketsSdkError = SdkError::service_error(ListBucketsError::generic(meta), ());

        let err = classify_sdk_error(&err);
        assert_eq!(err.kind(), ErrorKind::Transient);
        assert_eq!(err.code(), Some("SlowDown"));
    }
}
