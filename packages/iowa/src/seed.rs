//! Auto-vivification of missing files.

use std::path::Path;

use iowa_storage::Storage;
use serde::Serialize;

use crate::{require_path, Content, Encoding, Error, Iowa, Result};

/// Outcome of [`Iowa::create_if_not_exists`].
///
/// A failed seeding write is reported as [`Error::Write`](crate::Error::Write)
/// instead, carrying `existed_before: false, created: false` in
/// [`Error::creation`](crate::Error::creation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationResult {
    pub existed_before: bool,
    pub created: bool,
}

impl<S: Storage> Iowa<S> {
    /// Create `path` with `seed` as its content unless it already exists.
    ///
    /// Writes at most once; an existing file is never touched.
    pub async fn create_if_not_exists(
        &self,
        path: impl AsRef<Path>,
        seed: impl Into<Content>,
        json: bool,
    ) -> Result<CreationResult> {
        self.seed_file(path.as_ref(), &seed.into(), json, Encoding::default())
            .await
    }

    pub(crate) async fn seed_file(
        &self,
        path: &Path,
        seed: &Content,
        json: bool,
        encoding: Encoding,
    ) -> Result<CreationResult> {
        require_path(path)?;

        if self.storage.probe_exists(path).await {
            tracing::trace!("{} already exists, leaving it alone", path.display());
            return Ok(CreationResult {
                existed_before: true,
                created: false,
            });
        }

        tracing::debug!("Seeding {}...", path.display());
        self.persist(path, seed, json, encoding)
            .await
            .map_err(Error::seeding_failed)?;

        Ok(CreationResult {
            existed_before: false,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use iowa_storage::InMemoryStorage;
    use serde_json::json;

    #[tokio::test]
    async fn creates_missing_file_with_seed() {
        let iowa = Iowa::new(InMemoryStorage::new());

        let result = iowa
            .create_if_not_exists("data/new.json", json!({"count": 0}), true)
            .await
            .unwrap();

        assert_eq!(
            result,
            CreationResult {
                existed_before: false,
                created: true
            }
        );
        let raw = iowa
            .storage()
            .read_raw(Path::new("data/new.json"))
            .await
            .unwrap();
        assert_eq!(raw, Bytes::from_static(br#"{"count":0}"#));
    }

    #[tokio::test]
    async fn second_call_leaves_file_untouched() {
        let iowa = Iowa::new(InMemoryStorage::new());

        iowa.create_if_not_exists("seeded.txt", "first", false)
            .await
            .unwrap();
        let result = iowa
            .create_if_not_exists("seeded.txt", "second", false)
            .await
            .unwrap();

        assert_eq!(
            result,
            CreationResult {
                existed_before: true,
                created: false
            }
        );
        let raw = iowa
            .storage()
            .read_raw(Path::new("seeded.txt"))
            .await
            .unwrap();
        assert_eq!(raw, Bytes::from_static(b"first"));
    }

    #[tokio::test]
    async fn failed_seeding_write_is_an_error() {
        let iowa = Iowa::new(InMemoryStorage::new());
        iowa.storage().insert_file("blocker", Bytes::from_static(b"x"));

        let err = iowa
            .create_if_not_exists("blocker/child.json", json!({}), true)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
        assert_eq!(
            err.creation(),
            Some(CreationResult {
                existed_before: false,
                created: false
            })
        );
        assert!(!iowa
            .storage()
            .probe_exists(Path::new("blocker/child.json"))
            .await);
    }
}
