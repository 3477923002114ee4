//! Enumeration of visible subdirectories.

use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use iowa_storage::{EntryStat, Storage};
use serde::Serialize;

use crate::{require_path, Error, Iowa, Result};

/// A visible subdirectory found by [`Iowa::directories`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub stat: EntryStat,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

impl<S: Storage> Iowa<S> {
    /// List the direct subdirectories of `root`, skipping hidden entries.
    ///
    /// Children are stat'ed concurrently; any failed stat fails the whole
    /// listing. Order follows the storage listing.
    pub async fn directories(&self, root: impl AsRef<Path>) -> Result<Vec<DirectoryEntry>> {
        let root = root.as_ref();
        require_path(root)?;

        tracing::debug!("Listing {}...", root.display());
        let names = self
            .storage
            .list_directory(root)
            .await
            .map_err(|err| Error::listing(root, err))?;

        let stats = names
            .into_iter()
            .filter(|name| !is_hidden(name))
            .map(|name| async move {
                let path = root.join(name);
                let stat = self.stat(&path).await?;
                Ok::<_, Error>(DirectoryEntry { path, stat })
            });

        let entries = try_join_all(stats).await?;

        Ok(entries
            .into_iter()
            .filter(|entry| entry.stat.is_dir())
            .collect())
    }
}
