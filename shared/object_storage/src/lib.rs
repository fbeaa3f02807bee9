//! Object storage access for the object consumer
//!
//! This crate provides the storage capability the event handler depends on:
//! fetching an object's content as a stream and deleting it once consumed.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
mod s3;

use std::fmt;
use std::pin::Pin;

use tokio::io::AsyncBufRead;

pub use error::{StorageError, StorageResult};
pub use s3::S3ObjectStorage;

/// Streamed object content
pub type ContentReader = Pin<Box<dyn AsyncBufRead + Send>>;

/// Address of a single object in a bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Bucket (container) name
    pub bucket: String,
    /// Object key, already URL-decoded
    pub key: String,
}

impl ObjectRef {
    /// Creates a new object reference
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Storage operations needed to consume an object
///
/// Implementations must tolerate concurrent calls, the handler fans out
/// over the records of a batch.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Opens the object's content as a byte stream
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the object does not exist and
    /// another `StorageError` variant if the request fails
    async fn fetch(&self, object: &ObjectRef) -> StorageResult<ContentReader>;

    /// Removes the object, marking it as consumed
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the request fails
    async fn delete(&self, object: &ObjectRef) -> StorageResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_ref_display() {
        let object = ObjectRef::new("uploads", "reports/2024/q1.csv");
        assert_eq!(object.to_string(), "s3://uploads/reports/2024/q1.csv");
    }
}
