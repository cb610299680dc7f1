//! Error types for the record client.

use tablink_blob::BlobError;
use tablink_core::{ConfigError, FormulaError};
use thiserror::Error;

/// Errors that can occur when using the record client.
#[derive(Debug, Error)]
pub enum Error {
    /// Client configuration error (missing credential or endpoint, no attachment store).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection error (network failure, DNS resolution, timeout).
    #[error("connection error: {0}")]
    Connection(String),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, or the status text when the body is empty.
        message: String,
    },

    /// Response deserialization error.
    #[error("failed to deserialize response: {0}")]
    Deserialization(String),

    /// Positional lookup past the end of a sequence.
    ///
    /// Raised both for a name lookup that matched no records and for an
    /// attachment index beyond the stored attachments.
    #[error("index {index} out of range for {what} (length {len})")]
    IndexOutOfRange {
        /// What was indexed.
        what: String,
        /// Requested index.
        index: usize,
        /// Actual length.
        len: usize,
    },

    /// A record did not carry an expected field.
    #[error("record {record} has no field '{field}'")]
    MissingField {
        /// Record key.
        record: String,
        /// Field name.
        field: String,
    },

    /// A record key that cannot address a record.
    #[error("invalid record key '{0}'")]
    InvalidKey(String),

    /// Filter formula could not be built.
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// Attachment hashing or upload failed.
    #[error("attachment upload failed: {0}")]
    Attachment(#[from] BlobError),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl Error {
    /// Returns `true` if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this is an index-out-of-range error.
    pub fn is_index_error(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// The HTTP status code, if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_configuration() {
        let err: Error = ConfigError::MissingApiKey.into();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("TABLINK_API_KEY")));
    }

    #[test]
    fn http_status_accessor() {
        let err = Error::Http {
            status: 422,
            message: "INVALID_REQUEST".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_connection_error());
        assert_eq!(Error::Connection("reset".into()).status(), None);
    }

    #[test]
    fn index_error_display() {
        let err = Error::IndexOutOfRange {
            what: "attachments in 'Plot'".into(),
            index: 2,
            len: 1,
        };
        assert!(err.is_index_error());
        assert_eq!(
            err.to_string(),
            "index 2 out of range for attachments in 'Plot' (length 1)"
        );
    }

    #[test]
    fn missing_field_display() {
        let err = Error::MissingField {
            record: "rec1".into(),
            field: "Name".into(),
        };
        assert_eq!(err.to_string(), "record rec1 has no field 'Name'");
    }
}
