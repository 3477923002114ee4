use std::path::{Path, PathBuf};
use std::sync::Arc;

use iowa::{AccessOptions, Bytes, Content, Error, InMemoryStorage, Iowa, Storage};
use serde_json::json;

#[tokio::test]
async fn shared_backend_sees_writes_from_every_handle() {
    let storage = Arc::new(InMemoryStorage::new());
    let writer = Iowa::new(Arc::clone(&storage));
    let reader = Iowa::new(Arc::clone(&storage));

    writer
        .write_file("shared/state.json", json!({"step": 2}), &AccessOptions::new())
        .await
        .unwrap();

    let state = reader
        .read_file(
            "shared/state.json",
            &AccessOptions::new().with_create_if_not_exists(false),
        )
        .await
        .unwrap();
    assert_eq!(state, Content::Json(json!({"step": 2})));
    assert!(storage.probe_exists(Path::new("shared")).await);
}

#[tokio::test]
async fn borrowed_backend_works_like_an_owned_one() {
    let storage = InMemoryStorage::new();
    let iowa = Iowa::new(&storage);

    iowa.write_text_file("note.txt", "remember", &AccessOptions::new())
        .await
        .unwrap();

    assert_eq!(
        storage.read_raw(Path::new("note.txt")).await.unwrap(),
        Bytes::from_static(b"remember")
    );
}

#[tokio::test]
async fn seeded_read_then_missing_files() {
    let iowa = Iowa::new(InMemoryStorage::new());
    let options = AccessOptions::new().with_seed(json!([]));

    iowa.read_file("queue/pending.json", &options).await.unwrap();

    let missing = iowa
        .missing_files(["queue/pending.json", "queue/done.json"])
        .await;
    assert_eq!(missing, vec![PathBuf::from("queue/done.json")]);
}

#[tokio::test]
async fn directories_after_writes() {
    let iowa = Iowa::new(InMemoryStorage::new());
    for path in ["data/2024/a.json", "data/2025/b.json", "data/.cache/c.json"] {
        iowa.write_file(path, json!({}), &AccessOptions::new())
            .await
            .unwrap();
    }
    iowa.write_text_file("data/README", "hello", &AccessOptions::new())
        .await
        .unwrap();

    let entries = iowa.directories("data").await.unwrap();

    let paths: Vec<PathBuf> = entries.into_iter().map(|e| e.path).collect();
    assert_eq!(
        paths,
        vec![PathBuf::from("data/2024"), PathBuf::from("data/2025")]
    );
}

#[tokio::test]
async fn failing_backend_surfaces_unexpected_errors() {
    let storage = InMemoryStorage::new();
    storage.insert_file("vault/secret.json", Bytes::from_static(b"{}"));
    storage.poison("vault/secret.json");
    let iowa = Iowa::new(storage);

    let err = iowa
        .read_file("vault/secret.json", &AccessOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedIo { .. }));
    assert_eq!(
        err.reason(),
        "File “vault/secret.json” triggered an unexpected error."
    );
    assert!(std::error::Error::source(&err).is_some());

    let result = iowa.exists("vault/secret.json").await.unwrap();
    assert!(!result.exists);
}
