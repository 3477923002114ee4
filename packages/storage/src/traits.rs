//! The storage trait consumed by the file-access layer.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{EntryStat, Result};

/// Raw primitives over a hierarchical file store.
///
/// This is the lowest-level interface. Content is just bytes; there is no
/// encoding, no JSON, and no auto-creation at this layer.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Storage>`.
///
/// # Example
///
/// ```rust,ignore
/// use iowa_storage::{Storage, StorageError};
/// use bytes::Bytes;
///
/// async fn copy(store: &dyn Storage, from: &Path, to: &Path) -> Result<(), StorageError> {
///     let data = store.read_raw(from).await?;
///     store.write_raw(to, data).await
/// }
/// ```
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the whole content of a file.
    ///
    /// # Returns
    ///
    /// * `Ok(bytes)` - The file content.
    /// * `Err(StorageError::NotFound)` - The file does not exist.
    /// * `Err(StorageError::Io)` - Any other failure.
    async fn read_raw(&self, path: &Path) -> Result<Bytes>;

    /// Write `data` to a file, truncating and replacing existing content.
    ///
    /// The parent directory must already exist.
    async fn write_raw(&self, path: &Path, data: Bytes) -> Result<()>;

    /// Returns `true` if `path` currently denotes an entry. Never fails.
    async fn probe_exists(&self, path: &Path) -> bool;

    /// Fetch metadata for an entry.
    async fn stat_entry(&self, path: &Path) -> Result<EntryStat>;

    /// List the names of the direct children of a directory.
    async fn list_directory(&self, path: &Path) -> Result<Vec<String>>;

    /// Create a directory and all of its missing ancestors.
    ///
    /// Succeeds without doing anything if the directory already exists.
    async fn ensure_directory_chain(&self, path: &Path) -> Result<()>;
}

// Blanket implementations for references, boxes and shared handles

#[async_trait]
impl<T: Storage + ?Sized> Storage for &T {
    async fn read_raw(&self, path: &Path) -> Result<Bytes> {
        (**self).read_raw(path).await
    }

    async fn write_raw(&self, path: &Path, data: Bytes) -> Result<()> {
        (**self).write_raw(path, data).await
    }

    async fn probe_exists(&self, path: &Path) -> bool {
        (**self).probe_exists(path).await
    }

    async fn stat_entry(&self, path: &Path) -> Result<EntryStat> {
        (**self).stat_entry(path).await
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        (**self).list_directory(path).await
    }

    async fn ensure_directory_chain(&self, path: &Path) -> Result<()> {
        (**self).ensure_directory_chain(path).await
    }
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for Box<T> {
    async fn read_raw(&self, path: &Path) -> Result<Bytes> {
        self.as_ref().read_raw(path).await
    }

    async fn write_raw(&self, path: &Path, data: Bytes) -> Result<()> {
        self.as_ref().write_raw(path, data).await
    }

    async fn probe_exists(&self, path: &Path) -> bool {
        self.as_ref().probe_exists(path).await
    }

    async fn stat_entry(&self, path: &Path) -> Result<EntryStat> {
        self.as_ref().stat_entry(path).await
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        self.as_ref().list_directory(path).await
    }

    async fn ensure_directory_chain(&self, path: &Path) -> Result<()> {
        self.as_ref().ensure_directory_chain(path).await
    }
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for Arc<T> {
    async fn read_raw(&self, path: &Path) -> Result<Bytes> {
        self.as_ref().read_raw(path).await
    }

    async fn write_raw(&self, path: &Path, data: Bytes) -> Result<()> {
        self.as_ref().write_raw(path, data).await
    }

    async fn probe_exists(&self, path: &Path) -> bool {
        self.as_ref().probe_exists(path).await
    }

    async fn stat_entry(&self, path: &Path) -> Result<EntryStat> {
        self.as_ref().stat_entry(path).await
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        self.as_ref().list_directory(path).await
    }

    async fn ensure_directory_chain(&self, path: &Path) -> Result<()> {
        self.as_ref().ensure_directory_chain(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStorage;

    #[tokio::test]
    async fn object_safety_works() {
        let store = InMemoryStorage::new();
        let boxed: Box<dyn Storage> = Box::new(store);

        boxed
            .write_raw(Path::new("test"), Bytes::from_static(b"data"))
            .await
            .unwrap();
        let result = boxed.read_raw(Path::new("test")).await.unwrap();
        assert_eq!(result, Bytes::from_static(b"data"));
    }

    #[tokio::test]
    async fn ref_blanket_impl_works() {
        let store = InMemoryStorage::new();
        let store_ref: &InMemoryStorage = &store;

        store_ref
            .write_raw(Path::new("ref_test"), Bytes::from_static(b"ref_data"))
            .await
            .unwrap();
        assert!(Storage::probe_exists(&store_ref, Path::new("ref_test")).await);
    }

    #[tokio::test]
    async fn arc_shares_one_store() {
        let store = Arc::new(InMemoryStorage::new());
        let other = store.clone();

        store
            .write_raw(Path::new("shared"), Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert!(other.probe_exists(Path::new("shared")).await);
    }
}
