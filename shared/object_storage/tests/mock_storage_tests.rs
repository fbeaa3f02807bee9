//! Tests for the in-memory storage double used by the handler tests

use object_storage::mock::{MockObjectStorage, StorageCall};
use object_storage::{ObjectRef, ObjectStorage, StorageError};
use pretty_assertions::assert_eq;
use tokio::io::AsyncReadExt;

#[tokio::test]
async fn test_fetch_then_delete_happy_path() {
    let storage = MockObjectStorage::new().with_object("uploads", "a.csv", "id,name\n1,alice\n");
    let object = ObjectRef::new("uploads", "a.csv");

    let mut reader = storage.fetch(&object).await.expect("Failed to fetch object");
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .await
        .expect("Failed to read content");
    assert_eq!(content, "id,name\n1,alice\n");

    storage.delete(&object).await.expect("Failed to delete object");
    assert!(!storage.contains(&object), "Object should be gone after delete");

    assert_eq!(
        storage.calls(),
        vec![
            StorageCall::Fetch(object.clone()),
            StorageCall::Delete(object),
        ]
    );
}

#[tokio::test]
async fn test_fetch_missing_object_is_not_found() {
    let storage = MockObjectStorage::new();
    let result = storage.fetch(&ObjectRef::new("uploads", "missing.csv")).await;

    assert!(matches!(result, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_injected_failures() {
    let storage = MockObjectStorage::new()
        .with_object("uploads", "broken.csv", "x")
        .fail_fetch_for("broken.csv")
        .fail_delete_for("locked.csv");

    let fetch = storage.fetch(&ObjectRef::new("uploads", "broken.csv")).await;
    assert!(matches!(fetch, Err(StorageError::UpstreamError(_))));

    let delete = storage.delete(&ObjectRef::new("uploads", "locked.csv")).await;
    assert!(matches!(delete, Err(StorageError::AccessDenied(_))));

    assert!(
        storage.contains(&ObjectRef::new("uploads", "broken.csv")),
        "Failed fetch must not remove the object"
    );
}
