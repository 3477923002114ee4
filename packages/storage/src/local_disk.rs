//! Local disk storage backed by `tokio::fs`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use crate::{EntryStat, Result, Storage, StorageError};

/// Storage over the local filesystem.
///
/// Relative paths are resolved against `root` when one is set, and against
/// the process working directory otherwise. Absolute paths are used as given.
#[derive(Debug, Clone, Default)]
pub struct LocalDiskStorage {
    root: Option<PathBuf>,
}

impl LocalDiskStorage {
    /// Storage that resolves paths exactly as the operating system would.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Storage that resolves relative paths against `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl Storage for LocalDiskStorage {
    async fn read_raw(&self, path: &Path) -> Result<Bytes> {
        let file_path = self.resolve(path);
        tracing::trace!("Reading {}...", file_path.display());

        fs::read(&file_path)
            .await
            .map(Bytes::from)
            .map_err(|err| StorageError::from_io(path, err))
    }

    async fn write_raw(&self, path: &Path, data: Bytes) -> Result<()> {
        let file_path = self.resolve(path);
        tracing::trace!("Writing {} bytes to {}...", data.len(), file_path.display());

        fs::write(&file_path, &data)
            .await
            .map_err(|err| StorageError::from_io(path, err))
    }

    async fn probe_exists(&self, path: &Path) -> bool {
        fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }

    async fn stat_entry(&self, path: &Path) -> Result<EntryStat> {
        let metadata = fs::metadata(self.resolve(path))
            .await
            .map_err(|err| StorageError::from_io(path, err))?;

        Ok(EntryStat::from(&metadata))
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        let mut entries = fs::read_dir(self.resolve(path))
            .await
            .map_err(|err| StorageError::from_io(path, err))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| StorageError::from_io(path, err))?
        {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }

        Ok(names)
    }

    async fn ensure_directory_chain(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(self.resolve(path))
            .await
            .map_err(|err| StorageError::from_io(path, err))
    }
}
