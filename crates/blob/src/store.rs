use std::path::Path;

use async_trait::async_trait;

use crate::error::BlobError;

/// Access policy applied to a written object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectAcl {
    /// Readable only with backend credentials.
    #[default]
    Private,
    /// Readable by anyone holding the URL.
    PublicRead,
}

impl ObjectAcl {
    /// Canned ACL name as used by S3-compatible backends.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
        }
    }
}

/// Pluggable object storage backend for attachment files.
///
/// Implementors write whole files under a caller-chosen key and know how to
/// turn a `(bucket, key)` pair into the URL the object is served from.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Write the file at `path` to `bucket` under `key`.
    ///
    /// An existing object at the same key is replaced.
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        acl: ObjectAcl,
    ) -> Result<(), BlobError>;

    /// The URL an object written under `(bucket, key)` is served from.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
