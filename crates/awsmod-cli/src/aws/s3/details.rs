//! Shape S3 detail responses into JSON documents.
//!
//! Keys follow the service's own PascalCase field names so the documents
//! read the same as the S3 API reference. Fields the service omitted come
//! out as `null`; lists come out empty.

use aws_sdk_s3::operation::{
    get_bucket_accelerate_configuration::GetBucketAccelerateConfigurationOutput,
    get_bucket_acl::GetBucketAclOutput, get_bucket_cors::GetBucketCorsOutput,
    get_bucket_encryption::GetBucketEncryptionOutput,
    get_bucket_lifecycle_configuration::GetBucketLifecycleConfigurationOutput,
    get_bucket_location::GetBucketLocationOutput, get_bucket_logging::GetBucketLoggingOutput,
    get_bucket_notification_configuration::GetBucketNotificationConfigurationOutput,
    get_bucket_ownership_controls::GetBucketOwnershipControlsOutput,
    get_bucket_policy::GetBucketPolicyOutput,
    get_bucket_policy_status::GetBucketPolicyStatusOutput,
    get_bucket_replication::GetBucketReplicationOutput,
    get_bucket_request_payment::GetBucketRequestPaymentOutput,
    get_bucket_tagging::GetBucketTaggingOutput, get_bucket_website::GetBucketWebsiteOutput,
    get_public_access_block::GetPublicAccessBlockOutput,
};
use serde_json::{Value, json};

/// Wire text of an SDK enum, whether the field is required or optional
trait EnumText {
    fn text(self) -> Option<String>;
}

impl<T: AsRef<str>> EnumText for &T {
    fn text(self) -> Option<String> {
        Some(self.as_ref().to_string())
    }
}

impl<T: AsRef<str>> EnumText for Option<&T> {
    fn text(self) -> Option<String> {
        self.map(|v| v.as_ref().to_string())
    }
}

fn texts<T: AsRef<str>>(values: &[T]) -> Vec<&str> {
    values.iter().map(|v| v.as_ref()).collect()
}

pub fn accelerate_configuration(out: &GetBucketAccelerateConfigurationOutput) -> Value {
    json!({ "Status": out.status().text() })
}

pub fn acl(out: &GetBucketAclOutput) -> Value {
    let owner = out.owner().map(|o| {
        json!({
            "DisplayName": o.display_name(),
            "ID": o.id(),
        })
    });
    let grants: Vec<Value> = out
        .grants()
        .iter()
        .map(|grant| {
            let grantee = grant.grantee().map(|g| {
                json!({
                    "DisplayName": g.display_name(),
                    "EmailAddress": g.email_address(),
                    "ID": g.id(),
                    "Type": g.r#type().text(),
                    "URI": g.uri(),
                })
            });
            json!({
                "Grantee": grantee,
                "Permission": grant.permission().text(),
            })
        })
        .collect();

    json!({ "Owner": owner, "Grants": grants })
}

pub fn cors(out: &GetBucketCorsOutput) -> Value {
    let rules: Vec<Value> = out
        .cors_rules()
        .iter()
        .map(|rule| {
            json!({
                "ID": rule.id(),
                "AllowedHeaders": rule.allowed_headers(),
                "AllowedMethods": rule.allowed_methods(),
                "AllowedOrigins": rule.allowed_origins(),
                "ExposeHeaders": rule.expose_headers(),
                "MaxAgeSeconds": rule.max_age_seconds(),
            })
        })
        .collect();

    json!({ "CORSRules": rules })
}

pub fn encryption(out: &GetBucketEncryptionOutput) -> Value {
    let config = out.server_side_encryption_configuration().map(|config| {
        let rules: Vec<Value> = config
            .rules()
            .iter()
            .map(|rule| {
                let default = rule.apply_server_side_encryption_by_default().map(|d| {
                    json!({
                        "SSEAlgorithm": d.sse_algorithm().text(),
                        "KMSMasterKeyID": d.kms_master_key_id(),
                    })
                });
                json!({
                    "ApplyServerSideEncryptionByDefault": default,
                    "BucketKeyEnabled": rule.bucket_key_enabled(),
                })
            })
            .collect();
        json!({ "Rules": rules })
    });

    json!({ "ServerSideEncryptionConfiguration": config })
}

pub fn lifecycle_configuration(out: &GetBucketLifecycleConfigurationOutput) -> Value {
    let rules: Vec<Value> = out
        .rules()
        .iter()
        .map(|rule| {
            let expiration = rule.expiration().map(|e| {
                json!({
                    "Days": e.days(),
                    "ExpiredObjectDeleteMarker": e.expired_object_delete_marker(),
                })
            });
            let transitions: Vec<Value> = rule
                .transitions()
                .iter()
                .map(|t| {
                    json!({
                        "Days": t.days(),
                        "StorageClass": t.storage_class().text(),
                    })
                })
                .collect();
            let abort = rule
                .abort_incomplete_multipart_upload()
                .map(|a| json!({ "DaysAfterInitiation": a.days_after_initiation() }));
            json!({
                "ID": rule.id(),
                "Status": rule.status().text(),
                "Expiration": expiration,
                "Transitions": transitions,
                "AbortIncompleteMultipartUpload": abort,
            })
        })
        .collect();

    json!({ "Rules": rules })
}

pub fn location(out: &GetBucketLocationOutput) -> Value {
    // us-east-1 buckets come back as an empty element
    let constraint = out.location_constraint().text().filter(|c| !c.is_empty());
    json!({ "LocationConstraint": constraint })
}

pub fn logging(out: &GetBucketLoggingOutput) -> Value {
    let enabled = out.logging_enabled().map(|l| {
        json!({
            "TargetBucket": l.target_bucket(),
            "TargetPrefix": l.target_prefix(),
        })
    });

    json!({ "LoggingEnabled": enabled })
}

pub fn notification_configuration(out: &GetBucketNotificationConfigurationOutput) -> Value {
    let topics: Vec<Value> = out
        .topic_configurations()
        .iter()
        .map(|c| json!({ "Id": c.id(), "TopicArn": c.topic_arn(), "Events": texts(c.events()) }))
        .collect();
    let queues: Vec<Value> = out
        .queue_configurations()
        .iter()
        .map(|c| json!({ "Id": c.id(), "QueueArn": c.queue_arn(), "Events": texts(c.events()) }))
        .collect();
    let lambdas: Vec<Value> = out
        .lambda_function_configurations()
        .iter()
        .map(|c| {
            json!({
                "Id": c.id(),
                "LambdaFunctionArn": c.lambda_function_arn(),
                "Events": texts(c.events()),
            })
        })
        .collect();

    json!({
        "TopicConfigurations": topics,
        "QueueConfigurations": queues,
        "LambdaFunctionConfigurations": lambdas,
        "EventBridgeEnabled": out.event_bridge_configuration().is_some(),
    })
}

pub fn ownership_controls(out: &GetBucketOwnershipControlsOutput) -> Value {
    let controls = out.ownership_controls().map(|controls| {
        let rules: Vec<Value> = controls
            .rules()
            .iter()
            .map(|rule| json!({ "ObjectOwnership": rule.object_ownership().text() }))
            .collect();
        json!({ "Rules": rules })
    });

    json!({ "OwnershipControls": controls })
}

/// The policy document is kept as the raw JSON string S3 returns
pub fn policy(out: &GetBucketPolicyOutput) -> Value {
    json!({ "Policy": out.policy() })
}

pub fn policy_status(out: &GetBucketPolicyStatusOutput) -> Value {
    let status = out
        .policy_status()
        .map(|s| json!({ "IsPublic": s.is_public() }));

    json!({ "PolicyStatus": status })
}

pub fn replication(out: &GetBucketReplicationOutput) -> Value {
    let config = out.replication_configuration().map(|config| {
        let rules: Vec<Value> = config
            .rules()
            .iter()
            .map(|rule| {
                json!({
                    "ID": rule.id(),
                    "Priority": rule.priority(),
                    "Status": rule.status().text(),
                })
            })
            .collect();
        json!({ "Role": config.role(), "Rules": rules })
    });

    json!({ "ReplicationConfiguration": config })
}

pub fn request_payment(out: &GetBucketRequestPaymentOutput) -> Value {
    json!({ "Payer": out.payer().text() })
}

pub fn tagging(out: &GetBucketTaggingOutput) -> Value {
    let tags: Vec<Value> = out
        .tag_set()
        .iter()
        .map(|t| json!({ "Key": t.key(), "Value": t.value() }))
        .collect();

    json!({ "TagSet": tags })
}

pub fn website(out: &GetBucketWebsiteOutput) -> Value {
    let redirect = out.redirect_all_requests_to().map(|r| {
        json!({
            "HostName": r.host_name(),
            "Protocol": r.protocol().text(),
        })
    });

    json!({
        "IndexDocument": out.index_document().map(|d| json!({ "Suffix": d.suffix() })),
        "ErrorDocument": out.error_document().map(|d| json!({ "Key": d.key() })),
        "RedirectAllRequestsTo": redirect,
        "RoutingRulesCount": out.routing_rules().len(),
    })
}

pub fn public_access_block(out: &GetPublicAccessBlockOutput) -> Value {
    let config = out.public_access_block_configuration().map(|c| {
        json!({
            "BlockPublicAcls": c.block_public_acls(),
            "IgnorePublicAcls": c.ignore_public_acls(),
            "BlockPublicPolicy": c.block_public_policy(),
            "RestrictPublicBuckets": c.restrict_public_buckets(),
        })
    });

    json!({ "PublicAccessBlockConfiguration": config })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::types::{BucketLocationConstraint, CorsRule, Payer};

    #[test]
    fn test_location_missing_is_null() {
        let out = GetBucketLocationOutput::builder().build();
        assert_eq!(location(&out), json!({ "LocationConstraint": null }));
    }

    #[test]
    fn test_location_empty_is_null() {
        let out = GetBucketLocationOutput::builder()
            .location_constraint(BucketLocationConstraint::from(""))
            .build();
        assert_eq!(location(&out), json!({ "LocationConstraint": null }));
    }

    #[test]
    fn test_location_constraint_text() {
        let out = GetBucketLocationOutput::builder()
            .location_constraint(BucketLocationConstraint::EuWest1)
            .build();
        assert_eq!(location(&out), json!({ "LocationConstraint": "eu-west-1" }));
    }

    #[test]
    fn test_cors_shape() {
        let rule = CorsRule::builder()
            .allowed_origins("https://example.com")
            .allowed_methods("GET")
            .max_age_seconds(300)
            .build()
            .unwrap();
        let out = GetBucketCorsOutput::builder().cors_rules(rule).build();

        let value = cors(&out);
        let rule = &value["CORSRules"][0];
        assert_eq!(rule["AllowedOrigins"], json!(["https://example.com"]));
        assert_eq!(rule["AllowedMethods"], json!(["GET"]));
        assert_eq!(rule["AllowedHeaders"], json!([]));
        assert_eq!(rule["MaxAgeSeconds"], 300);
        assert_eq!(rule["ID"], Value::Null);
    }

    #[test]
    fn test_request_payment_shape() {
        let out = GetBucketRequestPaymentOutput::builder()
            .payer(Payer::Requester)
            .build();
        assert_eq!(request_payment(&out), json!({ "Payer": "Requester" }));
    }

    #[test]
    fn test_policy_is_kept_as_string() {
        let doc = r#"{"Version":"2012-10-17","Statement":[]}"#;
        let out = GetBucketPolicyOutput::builder().policy(doc).build();
        assert_eq!(policy(&out), json!({ "Policy": doc }));
    }
}
