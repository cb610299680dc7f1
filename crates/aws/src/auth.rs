use tracing::{debug, info};

use crate::s3::S3Config;

/// STS session name used when assuming a role.
const SESSION_NAME: &str = "tablink";

/// Build an AWS SDK configuration for the given [`S3Config`].
///
/// Uses the standard AWS SDK environment credential chain, overriding the
/// endpoint when one is configured and assuming `role_arn` via STS when set.
/// Assumed-role credentials refresh automatically before they expire.
pub async fn build_sdk_config(config: &S3Config) -> aws_config::SdkConfig {
    let region = aws_config::Region::new(config.region.clone());
    let mut loader = aws_config::from_env().region(region.clone());

    if let Some(endpoint) = &config.endpoint_url {
        debug!(endpoint = %endpoint, "using custom S3 endpoint");
        loader = loader.endpoint_url(endpoint);
    }

    let Some(role_arn) = &config.role_arn else {
        return loader.load().await;
    };

    info!(session_name = SESSION_NAME, "assuming IAM role via STS");

    // The assume-role provider needs the base credentials and endpoint for its STS calls.
    let base_config = loader.load().await;
    let provider = aws_config::sts::AssumeRoleProvider::builder(role_arn)
        .session_name(SESSION_NAME)
        .region(region.clone())
        .configure(&base_config)
        .build()
        .await;

    let mut final_loader = aws_config::from_env()
        .region(region)
        .credentials_provider(provider);
    if let Some(endpoint) = &config.endpoint_url {
        final_loader = final_loader.endpoint_url(endpoint);
    }
    final_loader.load().await
}

#[cfg(all(test, feature = "integration"))]
mod integration_tests {
    use super::*;

    // Loading an SDK config needs system root certificates, so these only run
    // with the `integration` feature.

    #[tokio::test]
    async fn build_sdk_config_sets_region() {
        let config = S3Config::new("ap-northeast-1");
        let sdk_config = build_sdk_config(&config).await;
        assert_eq!(
            sdk_config.region().map(|r| r.as_ref()),
            Some("ap-northeast-1")
        );
    }

    #[tokio::test]
    async fn build_sdk_config_with_endpoint() {
        let config = S3Config::new("us-west-2").with_endpoint_url("http://localhost:9000");
        let sdk_config = build_sdk_config(&config).await;
        assert_eq!(sdk_config.region().map(|r| r.as_ref()), Some("us-west-2"));
    }
}
