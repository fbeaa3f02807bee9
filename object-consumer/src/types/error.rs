//! Error types for the event handler

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Batch-level failures, these abort the invocation
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The local scan directory could not be listed
    #[error("Failed to scan directory {}", path.display())]
    ScanDirectory {
        /// Directory that was scanned
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A matching local file could not be opened
    #[error("Failed to open local file {}", path.display())]
    OpenLocalFile {
        /// File that was opened
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The processing step rejected a local file
    #[error("Failed to process local file {}", path.display())]
    ProcessLocalFile {
        /// File that was processed
        path: PathBuf,
        /// Error returned by the processor
        #[source]
        source: anyhow::Error,
    },
}

/// A notification record that does not name an object
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRecord {
    /// Record has no bucket name
    #[error("Record {index} has no bucket name")]
    MissingBucket {
        /// Position of the record in the batch
        index: usize,
        /// Object key, when present
        key: Option<String>,
    },

    /// Record has no object key
    #[error("Record {index} has no object key")]
    MissingKey {
        /// Position of the record in the batch
        index: usize,
        /// Bucket name, when present
        bucket: Option<String>,
    },
}
