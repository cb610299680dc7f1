//! S3 storage backend for tablink attachments.
//!
//! [`S3ObjectStore`] implements [`tablink_blob::ObjectStore`] on top of the
//! AWS SDK. Objects are written with `PutObject` and served from
//! virtual-hosted-style URLs (`https://{bucket}.s3.amazonaws.com/{key}` by
//! default).
//!
//! Credentials come from the standard AWS SDK environment chain; see
//! [`S3Config`] for region, endpoint override and assume-role settings.

pub mod auth;
pub mod s3;

pub use s3::{DEFAULT_PUBLIC_DOMAIN, S3Config, S3ObjectStore};
