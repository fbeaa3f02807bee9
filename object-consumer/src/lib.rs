#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

pub mod config;
pub mod event;
pub mod file_scan;
pub mod handler;
pub mod processor;
pub mod types;

pub use config::HandlerConfig;
pub use handler::{FailureStage, InvocationSummary, ObjectConsumer, RecordFailure};
pub use processor::{ContentProcessor, ContentSource, DiscardProcessor};
