// Not every util is used in every test, so we allow dead code
#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use object_consumer::event::S3Notification;
use object_consumer::{ContentProcessor, ContentSource, HandlerConfig, ObjectConsumer};
use object_storage::mock::MockObjectStorage;
use object_storage::ContentReader;
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tracing::subscriber::DefaultGuard;

pub const FUNCTION_NAME: &str = "object-consumer-test";
pub const BUCKET: &str = "uploads";

/// Builds a notification record the way S3 delivers it
pub fn s3_record(bucket: Option<&str>, key: Option<&str>) -> Value {
    json!({
        "eventVersion": "2.1",
        "eventSource": "aws:s3",
        "awsRegion": "us-east-1",
        "eventTime": "2024-01-01T12:00:00.000Z",
        "eventName": "ObjectCreated:Put",
        "userIdentity": { "principalId": "AWS:AIDAEXAMPLE" },
        "requestParameters": { "sourceIPAddress": "127.0.0.1" },
        "responseElements": {
            "x-amz-request-id": "C3D13FE58DE4C810",
            "x-amz-id-2": "FMyUVURIY8/IgAtTv8xRjskZQpcIZ9KG4V5Wp6S7S/JRWeUWerMUE5JgHvANOjpD"
        },
        "s3": {
            "s3SchemaVersion": "1.0",
            "configurationId": "object-consumer-trigger",
            "bucket": {
                "name": bucket,
                "ownerIdentity": { "principalId": "A3NL1KOZZKExample" },
                "arn": "arn:aws:s3:::uploads"
            },
            "object": {
                "key": key,
                "size": 1024,
                "eTag": "d41d8cd98f00b204e9800998ecf8427e",
                "sequencer": "0055AED6DCD90281E5"
            }
        }
    })
}

/// Builds an event from raw records
pub fn s3_event_from(records: Vec<Value>) -> S3Notification {
    serde_json::from_value(json!({ "Records": records })).expect("Failed to build S3 event")
}

/// Builds an event with one record per key in `BUCKET`
pub fn s3_event(keys: &[&str]) -> S3Notification {
    s3_event_from(
        keys.iter()
            .map(|key| s3_record(Some(BUCKET), Some(key)))
            .collect(),
    )
}

/// Storage holding one CSV object per key in `BUCKET`
pub fn storage_with(keys: &[&str]) -> MockObjectStorage {
    keys.iter().fold(MockObjectStorage::new(), |storage, key| {
        storage.with_object(BUCKET, key, format!("id,source\n1,{key}\n"))
    })
}

pub fn consumer(
    storage: Arc<MockObjectStorage>,
    processor: Arc<RecordingProcessor>,
    config: HandlerConfig,
) -> ObjectConsumer {
    ObjectConsumer::new(storage, processor, config)
}

/// Processor that keeps everything it was given
#[derive(Default)]
pub struct RecordingProcessor {
    seen: Mutex<Vec<(ContentSource, String)>>,
    fail_for: Option<String>,
}

impl RecordingProcessor {
    /// Fails for every source whose display form ends with `suffix`
    pub fn failing_for(suffix: &str) -> Self {
        Self {
            seen: Mutex::default(),
            fail_for: Some(suffix.to_string()),
        }
    }

    pub fn seen(&self) -> Vec<(ContentSource, String)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn sources(&self) -> Vec<ContentSource> {
        self.seen().into_iter().map(|(source, _)| source).collect()
    }
}

#[async_trait::async_trait]
impl ContentProcessor for RecordingProcessor {
    async fn process(
        &self,
        source: &ContentSource,
        mut content: ContentReader,
    ) -> anyhow::Result<()> {
        let mut text = String::new();
        content.read_to_string(&mut text).await?;

        if let Some(suffix) = &self.fail_for {
            if source.to_string().ends_with(suffix.as_str()) {
                anyhow::bail!("rejected {source}");
            }
        }

        self.seen.lock().unwrap().push((source.clone(), text));
        Ok(())
    }
}

/// Log output captured for the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes `tracing` output of the current thread into a buffer
pub fn capture_logs() -> (LogCapture, DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    (capture, tracing::subscriber::set_default(subscriber))
}
