//! In-memory storage double for tests

use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Mutex;

use crate::{ContentReader, ObjectRef, ObjectStorage, StorageError, StorageResult};

/// A storage call observed by [`MockObjectStorage`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageCall {
    /// `fetch` was called for the object
    Fetch(ObjectRef),
    /// `delete` was called for the object
    Delete(ObjectRef),
}

/// In-memory object storage that journals every call
#[derive(Default)]
pub struct MockObjectStorage {
    objects: Mutex<HashMap<ObjectRef, Vec<u8>>>,
    calls: Mutex<Vec<StorageCall>>,
    failing_fetches: HashSet<String>,
    failing_deletes: HashSet<String>,
}

impl MockObjectStorage {
    /// Creates an empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object to the storage
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned
    #[must_use]
    pub fn with_object(self, bucket: &str, key: &str, content: impl Into<Vec<u8>>) -> Self {
        self.objects
            .lock()
            .expect("mock storage lock poisoned")
            .insert(ObjectRef::new(bucket, key), content.into());
        self
    }

    /// Makes every `fetch` of `key` fail with an upstream error
    #[must_use]
    pub fn fail_fetch_for(mut self, key: &str) -> Self {
        self.failing_fetches.insert(key.to_string());
        self
    }

    /// Makes every `delete` of `key` fail with an access denied error
    #[must_use]
    pub fn fail_delete_for(mut self, key: &str) -> Self {
        self.failing_deletes.insert(key.to_string());
        self
    }

    /// Returns the calls made so far, in call order
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned
    #[must_use]
    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().expect("mock storage lock poisoned").clone()
    }

    /// Whether the object is still stored
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned
    #[must_use]
    pub fn contains(&self, object: &ObjectRef) -> bool {
        self.objects
            .lock()
            .expect("mock storage lock poisoned")
            .contains_key(object)
    }

    fn record(&self, call: StorageCall) {
        self.calls
            .lock()
            .expect("mock storage lock poisoned")
            .push(call);
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn fetch(&self, object: &ObjectRef) -> StorageResult<ContentReader> {
        self.record(StorageCall::Fetch(object.clone()));

        if self.failing_fetches.contains(&object.key) {
            return Err(StorageError::UpstreamError(format!(
                "injected fetch failure for {object}"
            )));
        }

        let content = self
            .objects
            .lock()
            .expect("mock storage lock poisoned")
            .get(object)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(object.to_string()))?;

        Ok(Box::pin(Cursor::new(content)))
    }

    async fn delete(&self, object: &ObjectRef) -> StorageResult<()> {
        self.record(StorageCall::Delete(object.clone()));

        if self.failing_deletes.contains(&object.key) {
            return Err(StorageError::AccessDenied(format!(
                "injected delete failure for {object}"
            )));
        }

        self.objects
            .lock()
            .expect("mock storage lock poisoned")
            .remove(object);
        Ok(())
    }
}
