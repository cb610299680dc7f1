//! Content keys: MD5 digests of file bytes.

use std::fmt;
use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};
use tokio::io::AsyncReadExt;

/// Read size used when hashing files.
pub const CHUNK_SIZE: usize = 4096;

/// Lowercase hex MD5 digest of a file's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    /// Hash an in-memory buffer.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(hex::encode(Md5::digest(data)))
    }

    /// Hash everything a reader yields, [`CHUNK_SIZE`] bytes at a time.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut hasher = Md5::new();
        let mut buffer = [0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
        Ok(Self(hex::encode(hasher.finalize())))
    }

    /// Hash a file without loading it into memory.
    pub async fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut file = tokio::fs::File::open(path.as_ref()).await?;
        let mut hasher = Md5::new();
        let mut buffer = [0u8; CHUNK_SIZE];
        loop {
            let n = file.read(&mut buffer).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
        Ok(Self(hex::encode(hasher.finalize())))
    }

    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The file's extension including the leading dot, or an empty string.
///
/// Only the last extension counts (`a.tar.gz` gives `.gz`); dotfiles such as
/// `.env` have none.
pub fn file_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Storage key for a file: `prefix + digest + extension`.
pub fn object_key(prefix: &str, key: &ContentKey, path: &Path) -> String {
    format!("{prefix}{key}{}", file_extension(path))
}
