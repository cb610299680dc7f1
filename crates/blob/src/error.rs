use tablink_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while addressing or uploading attachments.
#[derive(Debug, Error)]
pub enum BlobError {
    /// The local file could not be read.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// A storage backend error occurred.
    #[error("blob storage error: {0}")]
    Storage(String),

    /// The addresser is missing required configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
