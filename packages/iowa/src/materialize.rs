//! Directory chain creation ahead of writes.

use std::path::Path;

use iowa_storage::Storage;

use crate::{require_path, Error, Iowa, Result};

impl<S: Storage> Iowa<S> {
    /// Make sure every ancestor directory of `path` exists.
    ///
    /// Does nothing for paths without a parent component. A failure is
    /// reported as [`Error::Write`], since it always precedes a write.
    pub async fn ensure_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        require_path(path)?;

        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                tracing::trace!("Ensuring directory {}...", parent.display());
                self.storage
                    .ensure_directory_chain(parent)
                    .await
                    .map_err(|err| Error::write(path, err))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use iowa_storage::InMemoryStorage;

    #[tokio::test]
    async fn creates_missing_ancestors() {
        let iowa = Iowa::new(InMemoryStorage::new());

        iowa.ensure_path("a/b/c.json").await.unwrap();

        assert!(iowa.storage().probe_exists(Path::new("a")).await);
        assert!(iowa.storage().probe_exists(Path::new("a/b")).await);
        assert!(!iowa.storage().probe_exists(Path::new("a/b/c.json")).await);
    }

    #[tokio::test]
    async fn top_level_file_needs_nothing() {
        let iowa = Iowa::new(InMemoryStorage::new());
        iowa.ensure_path("top.json").await.unwrap();
    }

    #[tokio::test]
    async fn file_in_the_way_is_a_write_error() {
        let iowa = Iowa::new(InMemoryStorage::new());
        iowa.storage().insert_file("a", Bytes::from_static(b"plain file"));

        let err = iowa.ensure_path("a/b/c.json").await.unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
        assert_eq!(err.path(), Some(Path::new("a/b/c.json")));
    }

    #[tokio::test]
    async fn empty_path_is_rejected() {
        let iowa = Iowa::new(InMemoryStorage::new());
        let err = iowa.ensure_path("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }
}
