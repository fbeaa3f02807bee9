//! S3-backed object storage

use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use tracing::debug;

use crate::{ContentReader, ObjectRef, ObjectStorage, StorageResult};

/// Object storage client for S3 operations
pub struct S3ObjectStorage {
    s3_client: Arc<S3Client>,
}

impl S3ObjectStorage {
    /// Creates a new storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn fetch(&self, object: &ObjectRef) -> StorageResult<ContentReader> {
        debug!(bucket = %object.bucket, key = %object.key, "Fetching object");

        let output = self
            .s3_client
            .get_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await?;

        debug!(
            bucket = %object.bucket,
            key = %object.key,
            content_length = ?output.content_length(),
            "Fetched object"
        );

        Ok(Box::pin(output.body.into_async_read()))
    }

    async fn delete(&self, object: &ObjectRef) -> StorageResult<()> {
        debug!(bucket = %object.bucket, key = %object.key, "Deleting object");

        self.s3_client
            .delete_object()
            .bucket(&object.bucket)
            .key(&object.key)
            .send()
            .await?;

        Ok(())
    }
}
