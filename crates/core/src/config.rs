//! Client configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Key prefix used for uploaded attachments when none is configured.
pub const DEFAULT_PREFIX: &str = "attachments/";

// Each setting is read from its `TABLINK_*` name first, then from the
// `AIRTABLE_*` name older deployments use.
const ENV_API_KEY: &[&str] = &["TABLINK_API_KEY", "AIRTABLE_API_KEY"];
const ENV_API_ENDPOINT: &[&str] = &["TABLINK_API_ENDPOINT", "AIRTABLE_API_ENDPOINT"];
const ENV_BUCKET: &[&str] = &["TABLINK_BUCKET", "AIRTABLE_BUCKET"];
const ENV_PREFIX: &[&str] = &["TABLINK_PREFIX", "AIRTABLE_FOLDER"];
const ENV_TIMEOUT_SECS: &[&str] = &["TABLINK_TIMEOUT_SECS"];

/// Configuration for connecting to a remote table base and its attachment bucket.
///
/// Built once at startup and passed by reference to the client. Empty strings
/// count as unset.
#[derive(Clone)]
pub struct TablinkConfig {
    /// Base API endpoint (e.g. `https://api.airtable.com/v0/appXXXX`).
    pub endpoint: Option<String>,
    /// API credential sent as a bearer token.
    pub api_key: Option<String>,
    /// Storage bucket for attachment uploads.
    pub bucket: Option<String>,
    /// Storage key prefix for attachment uploads.
    pub prefix: String,
    /// HTTP request timeout.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for TablinkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablinkConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for TablinkConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            bucket: None,
            prefix: DEFAULT_PREFIX.to_owned(),
            timeout: None,
        }
    }
}

impl TablinkConfig {
    /// Create a configuration with an explicit endpoint and API key.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            api_key: Some(api_key.into()),
            bucket: None,
            prefix: DEFAULT_PREFIX.to_owned(),
            timeout: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `TABLINK_API_ENDPOINT` (or `AIRTABLE_API_ENDPOINT`)
    /// - `TABLINK_API_KEY` (or `AIRTABLE_API_KEY`)
    /// - `TABLINK_BUCKET` (or `AIRTABLE_BUCKET`; optional, only needed for
    ///   attachment uploads)
    /// - `TABLINK_PREFIX` (or `AIRTABLE_FOLDER`; optional, defaults to
    ///   `attachments/`)
    /// - `TABLINK_TIMEOUT_SECS` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|&key| lookup(key).filter(|v| !v.is_empty()))
        };

        let timeout = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => Some(Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            )),
            None => None,
        };

        Ok(Self {
            endpoint: get(ENV_API_ENDPOINT),
            api_key: get(ENV_API_KEY),
            bucket: get(ENV_BUCKET),
            prefix: get(ENV_PREFIX).unwrap_or_else(|| DEFAULT_PREFIX.to_owned()),
            timeout,
        })
    }

    /// Override the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the attachment bucket.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the attachment key prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the HTTP request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check that the endpoint and API key are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;
        self.normalized_endpoint()?;
        Ok(())
    }

    /// The API key, or [`ConfigError::MissingApiKey`].
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// The endpoint with a guaranteed trailing `/`.
    pub fn normalized_endpoint(&self) -> Result<String, ConfigError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;
        Ok(normalize_endpoint(endpoint))
    }

    /// The attachment bucket, or [`ConfigError::MissingBucket`].
    pub fn bucket(&self) -> Result<&str, ConfigError> {
        self.bucket
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or(ConfigError::MissingBucket)
    }
}

/// Append a trailing `/` to an endpoint unless it already has one.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with('/') {
        endpoint.to_owned()
    } else {
        format!("{endpoint}/")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn new_sets_default_prefix() {
        let config = TablinkConfig::new("https://api.example/v0/app1", "key");
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert!(config.bucket.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let config = TablinkConfig::from_lookup(lookup(&[
            ("TABLINK_API_KEY", "key"),
            ("TABLINK_API_ENDPOINT", "https://api.example/v0/app1"),
            ("TABLINK_BUCKET", "my-bucket"),
            ("TABLINK_PREFIX", "uploads/"),
            ("TABLINK_TIMEOUT_SECS", "12"),
        ]))
        .unwrap();
        assert_eq!(config.api_key().unwrap(), "key");
        assert_eq!(config.bucket().unwrap(), "my-bucket");
        assert_eq!(config.prefix, "uploads/");
        assert_eq!(config.timeout, Some(Duration::from_secs(12)));
    }

    #[test]
    fn from_lookup_defaults_prefix_and_ignores_empty_values() {
        let config = TablinkConfig::from_lookup(lookup(&[
            ("TABLINK_API_KEY", ""),
            ("TABLINK_PREFIX", ""),
        ]))
        .unwrap();
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn from_lookup_falls_back_to_airtable_names() {
        let config = TablinkConfig::from_lookup(lookup(&[
            ("AIRTABLE_API_KEY", "legacy-key"),
            ("AIRTABLE_API_ENDPOINT", "https://api.example/v0/app1"),
            ("AIRTABLE_BUCKET", "legacy-bucket"),
            ("AIRTABLE_FOLDER", "files/"),
        ]))
        .unwrap();
        assert_eq!(config.api_key().unwrap(), "legacy-key");
        assert_eq!(config.endpoint.as_deref(), Some("https://api.example/v0/app1"));
        assert_eq!(config.bucket().unwrap(), "legacy-bucket");
        assert_eq!(config.prefix, "files/");
    }

    #[test]
    fn tablink_names_take_precedence() {
        let config = TablinkConfig::from_lookup(lookup(&[
            ("TABLINK_API_KEY", "new-key"),
            ("AIRTABLE_API_KEY", "legacy-key"),
            ("TABLINK_BUCKET", ""),
            ("AIRTABLE_BUCKET", "legacy-bucket"),
        ]))
        .unwrap();
        assert_eq!(config.api_key().unwrap(), "new-key");
        assert_eq!(config.bucket().unwrap(), "legacy-bucket");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err =
            TablinkConfig::from_lookup(lookup(&[("TABLINK_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".into()));
    }

    #[test]
    fn default_uses_default_prefix() {
        assert_eq!(TablinkConfig::default().prefix, DEFAULT_PREFIX);
    }

    #[test]
    fn validate_requires_api_key() {
        let config = TablinkConfig::default().with_endpoint("https://api.example/v0/app1");
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn validate_requires_endpoint() {
        let config = TablinkConfig::default().with_api_key("key");
        assert_eq!(config.validate(), Err(ConfigError::MissingEndpoint));
    }

    #[test]
    fn endpoint_gets_trailing_slash() {
        let config = TablinkConfig::new("https://api.example/v0/app1", "key");
        assert_eq!(
            config.normalized_endpoint().unwrap(),
            "https://api.example/v0/app1/"
        );
        let config = TablinkConfig::new("https://api.example/v0/app1/", "key");
        assert_eq!(
            config.normalized_endpoint().unwrap(),
            "https://api.example/v0/app1/"
        );
    }

    #[test]
    fn bucket_is_only_required_on_demand() {
        let config = TablinkConfig::new("https://api.example/v0/app1", "key");
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket(), Err(ConfigError::MissingBucket));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = TablinkConfig::new("https://api.example/v0/app1", "super-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }
}
