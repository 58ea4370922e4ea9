//! In-memory fakes of the service operation traits, and a stub HTTP
//! client for exercising the real SDK clients.

use crate::aws::error::AwsError;
use crate::aws::operations::{BucketOperations, TagOperations};
use aws_smithy_runtime_api::client::http::{
    HttpClient, HttpConnector, HttpConnectorFuture, HttpConnectorSettings, SharedHttpConnector,
};
use aws_smithy_runtime_api::client::orchestrator::{HttpRequest, HttpResponse};
use aws_smithy_runtime_api::client::result::ConnectorError;
use aws_smithy_runtime_api::client::runtime_components::RuntimeComponents;
use aws_smithy_runtime_api::http::StatusCode;
use aws_smithy_types::body::SdkBody;
use awsmod_common::{Bucket, BucketDetail, TagMap};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

pub fn access_denied() -> AwsError {
    AwsError::Sdk {
        code: Some("AccessDenied".to_string()),
        message: "Access Denied".to_string(),
    }
}

pub fn connection_error() -> AwsError {
    AwsError::Connection {
        message: "dispatch failure".to_string(),
    }
}

pub fn not_configured(code: &str) -> AwsError {
    AwsError::NotConfigured {
        code: code.to_string(),
        message: "not configured".to_string(),
    }
}

/// Fake S3 account. Details that were not set answer with `{}`.
#[derive(Default)]
pub struct FakeS3 {
    buckets: Vec<Bucket>,
    list_error: Option<AwsError>,
    details: HashMap<(String, BucketDetail), Result<Value, AwsError>>,
    calls: Mutex<Vec<(String, BucketDetail)>>,
}

impl FakeS3 {
    pub fn with_buckets(names: &[&str]) -> Self {
        Self {
            buckets: names.iter().map(|name| Bucket::new(*name, None)).collect(),
            ..Self::default()
        }
    }

    pub fn failing_list(error: AwsError) -> Self {
        Self {
            list_error: Some(error),
            ..Self::default()
        }
    }

    pub fn detail(mut self, bucket: &str, detail: BucketDetail, value: Value) -> Self {
        self.details.insert((bucket.to_string(), detail), Ok(value));
        self
    }

    pub fn detail_error(mut self, bucket: &str, detail: BucketDetail, error: AwsError) -> Self {
        self.details.insert((bucket.to_string(), detail), Err(error));
        self
    }

    /// Detail calls made so far, in order
    pub fn calls(&self) -> Vec<(String, BucketDetail)> {
        self.calls.lock().unwrap().clone()
    }
}

impl BucketOperations for FakeS3 {
    async fn list_buckets(&self) -> Result<Vec<Bucket>, AwsError> {
        match &self.list_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.buckets.clone()),
        }
    }

    async fn get_detail(&self, bucket: &str, detail: BucketDetail) -> Result<Value, AwsError> {
        self.calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), detail));
        self.details
            .get(&(bucket.to_string(), detail))
            .cloned()
            .unwrap_or_else(|| Ok(json!({})))
    }
}

/// Recorded call against [`FakeEfs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCall {
    List,
    Tag(TagMap),
    Untag(Vec<String>),
}

/// Fake EFS resource holding one tag set
#[derive(Default)]
pub struct FakeEfs {
    tags: Mutex<TagMap>,
    calls: Mutex<Vec<TagCall>>,
    fail_list: Option<AwsError>,
    fail_tag: Option<AwsError>,
    fail_untag: Option<AwsError>,
}

impl FakeEfs {
    pub fn with_tags(tags: &[(&str, &str)]) -> Self {
        let tags = tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            tags: Mutex::new(tags),
            ..Self::default()
        }
    }

    pub fn fail_list(mut self, error: AwsError) -> Self {
        self.fail_list = Some(error);
        self
    }

    pub fn fail_tag(mut self, error: AwsError) -> Self {
        self.fail_tag = Some(error);
        self
    }

    pub fn fail_untag(mut self, error: AwsError) -> Self {
        self.fail_untag = Some(error);
        self
    }

    pub fn tags(&self) -> TagMap {
        self.tags.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<TagCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that would modify the resource
    pub fn mutations(&self) -> Vec<TagCall> {
        self.calls()
            .into_iter()
            .filter(|call| *call != TagCall::List)
            .collect()
    }
}

impl TagOperations for FakeEfs {
    async fn list_tags(&self, _resource: &str) -> Result<TagMap, AwsError> {
        self.calls.lock().unwrap().push(TagCall::List);
        if let Some(error) = &self.fail_list {
            return Err(error.clone());
        }
        Ok(self.tags())
    }

    async fn tag_resource(&self, _resource: &str, tags: &TagMap) -> Result<(), AwsError> {
        self.calls.lock().unwrap().push(TagCall::Tag(tags.clone()));
        if let Some(error) = &self.fail_tag {
            return Err(error.clone());
        }
        let mut current = self.tags.lock().unwrap();
        for (key, value) in tags {
            current.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn untag_resource(&self, _resource: &str, keys: &[String]) -> Result<(), AwsError> {
        self.calls
            .lock()
            .unwrap()
            .push(TagCall::Untag(keys.to_vec()));
        if let Some(error) = &self.fail_untag {
            return Err(error.clone());
        }
        let mut current = self.tags.lock().unwrap();
        for key in keys {
            current.remove(key);
        }
        Ok(())
    }
}

type Respond = dyn Fn(&str) -> Option<(u16, String)> + Send + Sync;

/// HTTP client answering SDK requests from a closure over the request URI.
///
/// A `None` answer fails the request as if the connection was refused.
#[derive(Clone)]
pub struct StubHttp {
    respond: Arc<Respond>,
    uris: Arc<Mutex<Vec<String>>>,
}

impl fmt::Debug for StubHttp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubHttp").finish_non_exhaustive()
    }
}

impl StubHttp {
    pub fn new(respond: impl Fn(&str) -> Option<(u16, String)> + Send + Sync + 'static) -> Self {
        Self {
            respond: Arc::new(respond),
            uris: Arc::default(),
        }
    }

    /// URIs of every request sent so far, in order
    pub fn uris(&self) -> Vec<String> {
        self.uris.lock().unwrap().clone()
    }

    pub fn s3_client(&self, region: &str) -> aws_sdk_s3::Client {
        use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region, retry::RetryConfig};

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "stub"))
            .retry_config(RetryConfig::disabled())
            .http_client(self.clone())
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }

    pub fn efs_client(&self, region: &str) -> aws_sdk_efs::Client {
        use aws_sdk_efs::config::{BehaviorVersion, Credentials, Region, retry::RetryConfig};

        let config = aws_sdk_efs::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "stub"))
            .retry_config(RetryConfig::disabled())
            .http_client(self.clone())
            .build();
        aws_sdk_efs::Client::from_conf(config)
    }
}

impl HttpConnector for StubHttp {
    fn call(&self, request: HttpRequest) -> HttpConnectorFuture {
        let uri = request.uri().to_string();
        self.uris.lock().unwrap().push(uri.clone());

        let result = match (self.respond)(&uri) {
            Some((status, body)) => {
                let status = StatusCode::try_from(status).unwrap();
                Ok(HttpResponse::new(status, SdkBody::from(body)))
            }
            None => Err(ConnectorError::io("connection refused".into())),
        };
        HttpConnectorFuture::ready(result)
    }
}

impl HttpClient for StubHttp {
    fn http_connector(
        &self,
        _settings: &HttpConnectorSettings,
        _components: &RuntimeComponents,
    ) -> SharedHttpConnector {
        SharedHttpConnector::new(self.clone())
    }
}
