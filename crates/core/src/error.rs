use thiserror::Error;

/// Errors raised while assembling a [`TablinkConfig`](crate::TablinkConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No API credential was supplied.
    #[error(
        "API key must be passed explicitly or via the TABLINK_API_KEY environment variable"
    )]
    MissingApiKey,

    /// No API base endpoint was supplied.
    #[error(
        "API endpoint must be passed explicitly or via the TABLINK_API_ENDPOINT environment variable"
    )]
    MissingEndpoint,

    /// Attachment uploads were requested without a storage bucket.
    #[error("storage bucket must be set (TABLINK_BUCKET) to upload attachments")]
    MissingBucket,

    /// The timeout value could not be parsed as whole seconds.
    #[error("invalid timeout '{0}': expected whole seconds")]
    InvalidTimeout(String),
}

/// Errors raised while building a filter formula.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Field names are wrapped in braces, so they cannot contain braces themselves.
    #[error("field name '{0}' cannot contain '{{' or '}}'")]
    InvalidFieldName(String),
}
