//! Content-addressed attachment storage.
//!
//! Files are stored under a key derived from the MD5 digest of their bytes,
//! so uploading identical content twice always lands on the same key and
//! yields the same public URL. The storage backend sits behind the
//! [`ObjectStore`] trait; `tablink-aws` provides the S3 implementation and
//! [`MemoryObjectStore`] covers tests and dry runs.

pub mod addresser;
pub mod content;
pub mod error;
pub mod memory;
pub mod store;

pub use addresser::ContentAddresser;
pub use content::{CHUNK_SIZE, ContentKey, file_extension, object_key};
pub use error::BlobError;
pub use memory::{MemoryObjectStore, StoredObject};
pub use store::{ObjectAcl, ObjectStore};
