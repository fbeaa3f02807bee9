//! Processing step applied to every consumed object and local file

use std::fmt;
use std::path::PathBuf;

use object_storage::{ContentReader, ObjectRef};
use tokio::io;
use tracing::debug;

/// Where a content stream came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Object fetched from storage
    Object(ObjectRef),
    /// File found in the local scan directory
    LocalFile(PathBuf),
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(object) => write!(f, "{object}"),
            Self::LocalFile(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Extension point that consumes a content stream
///
/// Content is expected to be UTF-8 text. Returning an error marks the
/// source as failed: a stored object is then left in place.
#[async_trait::async_trait]
pub trait ContentProcessor: Send + Sync {
    /// Consumes `content` read from `source`
    async fn process(&self, source: &ContentSource, content: ContentReader) -> anyhow::Result<()>;
}

/// Drains the stream without interpreting it
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardProcessor;

#[async_trait::async_trait]
impl ContentProcessor for DiscardProcessor {
    async fn process(
        &self,
        source: &ContentSource,
        mut content: ContentReader,
    ) -> anyhow::Result<()> {
        let bytes = io::copy_buf(&mut content, &mut io::sink()).await?;
        debug!("Discarded {} bytes from {}", bytes, source);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[tokio::test]
    async fn test_discard_processor_drains_content() {
        let source = ContentSource::LocalFile(PathBuf::from("/tmp/a.csv"));
        let content: ContentReader = Box::pin(Cursor::new(b"id,name\n1,alice\n".to_vec()));

        DiscardProcessor
            .process(&source, content)
            .await
            .expect("Discarding content should not fail");
    }

    #[test]
    fn test_content_source_display() {
        let source = ContentSource::Object(ObjectRef::new("uploads", "a.csv"));
        assert_eq!(source.to_string(), "s3://uploads/a.csv");
    }
}
