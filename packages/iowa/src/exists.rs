//! Existence probes: single, batched, and fail-hard `stat`.

use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use iowa_storage::{EntryStat, Storage};
use serde::Serialize;

use crate::{require_path, Error, Iowa, Result};

/// Outcome of an existence probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistsResult {
    pub exists: bool,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<EntryStat>,
    /// Why the probe came back negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<S: Storage> Iowa<S> {
    /// Check whether `path` denotes an entry.
    ///
    /// Storage failures of any kind, not-found included, come back as
    /// `exists: false` with a reason. The only error is an empty path.
    pub async fn exists(&self, path: impl AsRef<Path>) -> Result<ExistsResult> {
        let path = path.as_ref();
        require_path(path)?;

        Ok(self.probe(path).await)
    }

    /// Fetch metadata for `path`, failing when it cannot be read.
    pub async fn stat(&self, path: impl AsRef<Path>) -> Result<EntryStat> {
        let path = path.as_ref();
        require_path(path)?;

        self.storage
            .stat_entry(path)
            .await
            .map_err(|err| Error::from_storage(path, err))
    }

    /// Probe every path concurrently. Results follow input order, and empty
    /// paths are reported missing without touching storage.
    pub async fn exists_many<I, P>(&self, paths: I) -> Vec<ExistsResult>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let probes = paths.into_iter().map(|path| {
            let path = path.as_ref().to_path_buf();
            async move {
                if path.as_os_str().is_empty() {
                    ExistsResult {
                        exists: false,
                        path,
                        stat: None,
                        reason: Some("path is empty".to_string()),
                    }
                } else {
                    self.probe(&path).await
                }
            }
        });

        join_all(probes).await
    }

    /// The subset of `paths` that do not exist, in input order.
    pub async fn missing_files<I, P>(&self, paths: I) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.exists_many(paths)
            .await
            .into_iter()
            .filter(|result| !result.exists)
            .map(|result| result.path)
            .collect()
    }

    async fn probe(&self, path: &Path) -> ExistsResult {
        match self.storage.stat_entry(path).await {
            Ok(stat) => ExistsResult {
                exists: true,
                path: path.to_path_buf(),
                stat: Some(stat),
                reason: None,
            },
            Err(err) => {
                tracing::trace!("{} does not exist: {}", path.display(), err);
                ExistsResult {
                    exists: false,
                    path: path.to_path_buf(),
                    stat: None,
                    reason: Some(err.to_string()),
                }
            }
        }
    }
}
