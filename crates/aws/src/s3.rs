use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use serde::{Deserialize, Serialize};
use tablink_blob::{BlobError, ObjectAcl, ObjectStore};
use tracing::{debug, error, info, instrument};

use crate::auth::build_sdk_config;

/// Host suffix for public object URLs on AWS.
pub const DEFAULT_PUBLIC_DOMAIN: &str = "s3.amazonaws.com";

/// Configuration for the S3 object store.
///
/// Contains the region, an optional endpoint override for S3-compatible
/// services (e.g. `MinIO`), an optional STS role to assume for cross-account
/// buckets, and the host used in public URLs.
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region (e.g. `"us-east-1"`).
    pub region: String,

    /// Optional endpoint URL override.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Optional IAM role ARN to assume via STS.
    #[serde(default)]
    pub role_arn: Option<String>,

    /// Host suffix used to build public URLs (`https://{bucket}.{domain}/{key}`).
    ///
    /// Defaults to [`DEFAULT_PUBLIC_DOMAIN`]; set it when objects are served
    /// from an S3-compatible service or a regional host.
    #[serde(default)]
    pub public_domain: Option<String>,
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("role_arn", &self.role_arn.as_ref().map(|_| "[REDACTED]"))
            .field("public_domain", &self.public_domain)
            .finish()
    }
}

impl S3Config {
    /// Create a new `S3Config` with the given AWS region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url: None,
            role_arn: None,
            public_domain: None,
        }
    }

    /// Set the endpoint URL override.
    #[must_use]
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the IAM role ARN to assume.
    #[must_use]
    pub fn with_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        self.role_arn = Some(role_arn.into());
        self
    }

    /// Set the host suffix for public URLs.
    #[must_use]
    pub fn with_public_domain(mut self, domain: impl Into<String>) -> Self {
        self.public_domain = Some(domain.into());
        self
    }

    /// The host suffix for public URLs.
    pub fn public_domain(&self) -> &str {
        self.public_domain
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_DOMAIN)
    }
}

/// [`ObjectStore`] backed by AWS S3.
pub struct S3ObjectStore {
    config: S3Config,
    client: aws_sdk_s3::Client,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("config", &self.config)
            .field("client", &"<S3Client>")
            .finish()
    }
}

impl S3ObjectStore {
    /// Create a new store by building an AWS SDK client.
    pub async fn new(config: S3Config) -> Self {
        let sdk_config = build_sdk_config(&config).await;
        let client = aws_sdk_s3::Client::new(&sdk_config);
        Self { config, client }
    }

    /// Create a store with a pre-built client.
    pub fn with_client(config: S3Config, client: aws_sdk_s3::Client) -> Self {
        Self { config, client }
    }
}

fn canned_acl(acl: ObjectAcl) -> ObjectCannedAcl {
    match acl {
        ObjectAcl::Private => ObjectCannedAcl::Private,
        ObjectAcl::PublicRead => ObjectCannedAcl::PublicRead,
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn name(&self) -> &str {
        "aws-s3"
    }

    #[instrument(skip(self, path), fields(store = "aws-s3"))]
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        acl: ObjectAcl,
    ) -> Result<(), BlobError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| BlobError::Storage(format!("failed to open upload body: {e}")))?;

        debug!(acl = acl.as_str(), "uploading object to S3");

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .acl(canned_acl(acl))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(error = %message, "S3 put_object failed");
                BlobError::Storage(message)
            })?;

        info!("S3 object uploaded");
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("https://{bucket}.{}/{key}", self.config.public_domain())
    }
}
