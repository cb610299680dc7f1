use std::path::Path;
use std::sync::Arc;

use tablink_core::TablinkConfig;
use tracing::{debug, info, instrument};

use crate::content::{ContentKey, object_key};
use crate::error::BlobError;
use crate::store::{ObjectAcl, ObjectStore};

/// Uploads files under content-derived keys and returns their public URLs.
///
/// The key is `prefix + md5(content) + extension`, so identical content
/// always resolves to the same key. Uploads are issued every time; an
/// existing object is simply overwritten with the same bytes.
#[derive(Clone)]
pub struct ContentAddresser {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    prefix: String,
}

impl std::fmt::Debug for ContentAddresser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentAddresser")
            .field("store", &self.store.name())
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl ContentAddresser {
    /// Create an addresser writing to `bucket` under `prefix`.
    pub fn new(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create an addresser from the bucket and prefix in `config`.
    ///
    /// Fails if no bucket is configured.
    pub fn from_config(
        config: &TablinkConfig,
        store: Arc<dyn ObjectStore>,
    ) -> Result<Self, BlobError> {
        let bucket = config.bucket()?;
        Ok(Self::new(store, bucket, config.prefix.clone()))
    }

    /// Destination bucket.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The storage key the file at `path` would be uploaded under.
    pub async fn object_key(&self, path: &Path) -> Result<String, BlobError> {
        let content_key = ContentKey::from_file(path).await?;
        Ok(object_key(&self.prefix, &content_key, path))
    }

    /// Upload the file at `path` with a public-read ACL and return its URL.
    #[instrument(skip(self), fields(store = %self.store.name(), bucket = %self.bucket))]
    pub async fn upload(&self, path: &Path) -> Result<String, BlobError> {
        let key = self.object_key(path).await?;
        debug!(key = %key, "uploading attachment");

        self.store
            .put_file(&self.bucket, &key, path, ObjectAcl::PublicRead)
            .await?;

        let url = self.store.public_url(&self.bucket, &key);
        info!(key = %key, url = %url, "attachment uploaded");
        Ok(url)
    }
}
