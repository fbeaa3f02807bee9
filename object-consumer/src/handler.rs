//! Event handler: fetch, process and delete every object named in a notification batch

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::{stream, StreamExt, TryStreamExt};
use object_storage::{ContentReader, ObjectRef, ObjectStorage, StorageError};
use thiserror::Error;
use tokio::{fs::File, io::BufReader};
use tracing::{error, info, warn};

use crate::config::HandlerConfig;
use crate::event::{notification_batch, S3Notification};
use crate::file_scan::{scan_directory, FileFilter};
use crate::processor::{ContentProcessor, ContentSource};
use crate::types::{HandlerError, InvalidRecord};

/// Step at which a record failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// The record did not name an object
    Decode,
    /// The object could not be fetched
    Fetch,
    /// The processor rejected the content
    Process,
    /// The object was processed but could not be deleted
    Delete,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Self::Decode => "decode",
            Self::Fetch => "fetch",
            Self::Process => "process",
            Self::Delete => "delete",
        };
        f.write_str(stage)
    }
}

/// A record that was skipped because of a record-level failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    /// Bucket named by the record, if any
    pub bucket: Option<String>,
    /// Object key named by the record, if any
    pub key: Option<String>,
    /// Step that failed
    pub stage: FailureStage,
    /// Error detail
    pub error: String,
}

/// What a single invocation did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InvocationSummary {
    /// Objects fetched, processed and deleted, in batch order
    pub consumed: Vec<ObjectRef>,
    /// Records skipped after a failure, in batch order
    pub failed: Vec<RecordFailure>,
    /// Local files handed to the processor
    pub local_files: Vec<PathBuf>,
}

#[derive(Error, Debug)]
enum RecordError {
    #[error("Failed to fetch object: {0}")]
    Fetch(#[source] StorageError),

    #[error("Failed to process object: {0:#}")]
    Process(#[source] anyhow::Error),

    #[error("Failed to delete object: {0}")]
    Delete(#[source] StorageError),
}

impl RecordError {
    const fn stage(&self) -> FailureStage {
        match self {
            Self::Fetch(_) => FailureStage::Fetch,
            Self::Process(_) => FailureStage::Process,
            Self::Delete(_) => FailureStage::Delete,
        }
    }

    /// Whether S3 itself failed (5xx), as opposed to the request or the object
    const fn is_upstream_error(&self) -> bool {
        match self {
            Self::Fetch(err) | Self::Delete(err) => err.is_upstream_error(),
            Self::Process(_) => false,
        }
    }
}

/// Consumes the objects referenced by S3 notifications
///
/// Both collaborators are injected so they can be replaced in tests.
pub struct ObjectConsumer {
    storage: Arc<dyn ObjectStorage>,
    processor: Arc<dyn ContentProcessor>,
    config: HandlerConfig,
    file_filter: FileFilter,
}

impl ObjectConsumer {
    /// Creates a new handler
    #[must_use]
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        processor: Arc<dyn ContentProcessor>,
        config: HandlerConfig,
    ) -> Self {
        Self {
            storage,
            processor,
            config,
            file_filter: FileFilter::default(),
        }
    }

    /// Handles one notification batch
    ///
    /// Record-level failures are logged and reported in the summary, the
    /// remaining records are still consumed.
    ///
    /// # Errors
    ///
    /// Returns a `HandlerError` if the local scan directory cannot be read
    /// or one of its matching files cannot be opened or processed.
    pub async fn handle(
        &self,
        function_name: &str,
        event: Option<&S3Notification>,
    ) -> Result<InvocationSummary, HandlerError> {
        let started = Instant::now();
        let batch = notification_batch(event);

        if batch.is_empty() {
            info!(
                function_name,
                elapsed_ms = elapsed_ms(started),
                "Notification batch has no records"
            );
            return Ok(InvocationSummary::default());
        }

        let records = batch.len();
        let mut summary = InvocationSummary::default();

        let outcomes: Vec<_> = stream::iter(batch)
            .map(|record| self.consume_record(function_name, record))
            .buffered(self.config.concurrency_limit())
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                Ok(object) => summary.consumed.push(object),
                Err(failure) => summary.failed.push(failure),
            }
        }

        if let Some(scan_dir) = &self.config.scan_dir {
            summary.local_files = self
                .process_local_files(scan_dir)
                .await
                .inspect_err(|err| {
                    error!(
                        function_name,
                        error = %error_chain(err),
                        "Invocation failed"
                    );
                })?;
        }

        info!(
            function_name,
            records,
            consumed = summary.consumed.len(),
            failed = summary.failed.len(),
            local_files = summary.local_files.len(),
            elapsed_ms = elapsed_ms(started),
            "Notification batch handled"
        );

        Ok(summary)
    }

    async fn consume_record(
        &self,
        function_name: &str,
        record: Result<ObjectRef, InvalidRecord>,
    ) -> Result<ObjectRef, RecordFailure> {
        let object = match record {
            Ok(object) => object,
            Err(invalid) => {
                let (bucket, key) = match invalid.clone() {
                    InvalidRecord::MissingBucket { key, .. } => (None, key),
                    InvalidRecord::MissingKey { bucket, .. } => (bucket, None),
                };
                warn!(
                    function_name,
                    key = key.as_deref(),
                    bucket = bucket.as_deref(),
                    error = %invalid,
                    "Skipping notification record"
                );
                return Err(RecordFailure {
                    bucket,
                    key,
                    stage: FailureStage::Decode,
                    error: invalid.to_string(),
                });
            }
        };

        match self.consume_object(&object).await {
            Ok(()) => Ok(object),
            Err(err) => {
                error!(
                    function_name,
                    key = %object.key,
                    bucket = %object.bucket,
                    stage = %err.stage(),
                    upstream = err.is_upstream_error(),
                    error = %err,
                    "Failed to consume object"
                );
                Err(RecordFailure {
                    stage: err.stage(),
                    error: err.to_string(),
                    bucket: Some(object.bucket),
                    key: Some(object.key),
                })
            }
        }
    }

    async fn consume_object(&self, object: &ObjectRef) -> Result<(), RecordError> {
        let content = self
            .storage
            .fetch(object)
            .await
            .map_err(RecordError::Fetch)?;

        self.processor
            .process(&ContentSource::Object(object.clone()), content)
            .await
            .map_err(RecordError::Process)?;

        // Deleting marks the object as consumed, a failure leaves it for the next notification
        self.storage
            .delete(object)
            .await
            .map_err(RecordError::Delete)
    }

    async fn process_local_files(&self, scan_dir: &Path) -> Result<Vec<PathBuf>, HandlerError> {
        let files = scan_directory(scan_dir, &self.file_filter)
            .await
            .map_err(|source| HandlerError::ScanDirectory {
                path: scan_dir.to_path_buf(),
                source,
            })?;

        stream::iter(files.iter().map(Ok::<_, HandlerError>))
            .try_for_each_concurrent(self.config.concurrency_limit(), |path| {
                self.process_local_file(path)
            })
            .await?;

        Ok(files)
    }

    async fn process_local_file(&self, path: &Path) -> Result<(), HandlerError> {
        let file = File::open(path)
            .await
            .map_err(|source| HandlerError::OpenLocalFile {
                path: path.to_path_buf(),
                source,
            })?;
        let content: ContentReader = Box::pin(BufReader::new(file));

        self.processor
            .process(&ContentSource::LocalFile(path.to_path_buf()), content)
            .await
            .map_err(|source| HandlerError::ProcessLocalFile {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
