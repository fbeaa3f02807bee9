//! Error types for storage operations

use aws_sdk_s3::{
    error::SdkError,
    operation::{delete_object::DeleteObjectError, get_object::GetObjectError},
};
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while fetching or deleting an object
#[derive(Error, Debug)]
pub enum StorageError {
    /// Object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Caller is not allowed to access the object
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// AWS SDK error (dispatch, timeout, response parsing)
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl StorageError {
    /// Checks if this error represents an upstream (5xx) error
    #[must_use]
    pub const fn is_upstream_error(&self) -> bool {
        matches!(self, Self::UpstreamError(_))
    }

    fn from_status(status: u16, detail: String) -> Self {
        match status {
            404 => Self::NotFound(detail),
            403 => Self::AccessDenied(detail),
            500.. => Self::UpstreamError(detail),
            _ => Self::S3Error(detail),
        }
    }
}

impl From<SdkError<GetObjectError>> for StorageError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        match error {
            SdkError::ServiceError(err) => match err.err() {
                GetObjectError::NoSuchKey(_) => Self::NotFound(format!("{:?}", err.err())),
                other => Self::from_status(err.raw().status().as_u16(), format!("{other:?}")),
            },
            _ => Self::AwsError(error.to_string()),
        }
    }
}

impl From<SdkError<DeleteObjectError>> for StorageError {
    fn from(error: SdkError<DeleteObjectError>) -> Self {
        match error {
            SdkError::ServiceError(err) => {
                Self::from_status(err.raw().status().as_u16(), format!("{:?}", err.err()))
            }
            _ => Self::AwsError(error.to_string()),
        }
    }
}
