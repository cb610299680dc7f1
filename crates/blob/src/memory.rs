use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::BlobError;
use crate::store::{ObjectAcl, ObjectStore};

/// An object held by [`MemoryObjectStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object bytes.
    pub data: Vec<u8>,
    /// ACL the object was written with.
    pub acl: ObjectAcl,
}

/// In-memory [`ObjectStore`] backed by a [`DashMap`].
///
/// Every write is counted, including overwrites of an existing key, so tests
/// can observe that uploads are always issued.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<(String, String), StoredObject>,
    puts: AtomicU64,
}

impl MemoryObjectStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an object.
    pub fn get(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .map(|entry| entry.value().clone())
    }

    /// Number of distinct objects stored.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of writes issued, overwrites included.
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        acl: ObjectAcl,
    ) -> Result<(), BlobError> {
        let data = tokio::fs::read(path).await?;
        self.objects
            .insert((bucket.to_owned(), key.to_owned()), StoredObject { data, acl });
        self.puts.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("https://{bucket}.memory.invalid/{key}")
    }
}
