use serde::{Deserialize, Serialize};

/// An attachment reference stored as one element of an attachment field.
///
/// When posting, only `url` and `filename` are sent; the remote service fetches
/// the file from `url` and re-hosts it, so the URL must be publicly readable at
/// the time the record is saved. Attachments read back from the service also
/// carry the server-assigned `id`, which is kept so existing entries can be
/// sent back unchanged when extending a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Server-assigned attachment identifier (absent on freshly built attachments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Public URL of the file.
    pub url: String,
    /// Filename shown by the remote service.
    #[serde(default)]
    pub filename: String,
}

impl Attachment {
    /// Build a new attachment reference from a public URL and a filename.
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            filename: filename.into(),
        }
    }
}
