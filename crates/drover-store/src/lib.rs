//! Drover Store - Object storage access.
//!
//! The editor needs exactly two things from object storage: metadata for a
//! single object (basename and byte size, failing when the key is missing
//! or denotes a prefix) and a sequential, bounded-memory byte stream over
//! the same object. [`ObjectStore`] is that seam; [`S3Store`] implements it
//! over S3 with ranged GETs so large payloads never sit in memory whole.

pub mod s3;
pub mod uri;

use std::io::Read;

use thiserror::Error;

pub use s3::S3Store;
pub use uri::parse_object_uri;

/// Object metadata as the editor needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    /// Basename of the key; becomes the resource filename on upload.
    pub name: String,
    /// Full object key within the bucket.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
}

/// Object storage failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    /// The key names a prefix (a "directory"), not an object.
    #[error("object key denotes a prefix: {0}")]
    IsPrefix(String),

    #[error("invalid object URI: {0}")]
    InvalidUri(String),

    #[error("storage error: {0}")]
    Backend(String),
}

/// Read access to a bucket-and-key addressed object store.
pub trait ObjectStore {
    /// Fetches object metadata. Fails for missing objects and prefix keys.
    fn head(&self, bucket: &str, key: &str) -> Result<ObjectInfo, StoreError>;

    /// Opens a sequential reader over the object's bytes.
    fn reader(&self, bucket: &str, key: &str, size: u64)
        -> Result<Box<dyn Read + '_>, StoreError>;
}

/// Basename of an object key: the part after the final `/`.
pub(crate) fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_plain_key() {
        assert_eq!(basename("report.pdf"), "report.pdf");
    }

    #[test]
    fn test_basename_nested_key() {
        assert_eq!(basename("Dev/maps/compilation.tif"), "compilation.tif");
    }

    #[test]
    fn test_basename_prefix_key_is_empty() {
        assert_eq!(basename("Dev/"), "");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::IsPrefix("Dev/".to_string());
        assert_eq!(err.to_string(), "object key denotes a prefix: Dev/");
    }
}
