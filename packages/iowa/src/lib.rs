//! iowa: asynchronous file access with JSON on the way in and out.
//!
//! Reads and writes go through a [`Storage`] backend and add two things on
//! top of raw byte I/O:
//!
//! - **JSON duality**: content is serialized on write and parsed on read,
//!   unless JSON mode is switched off per call (the `*_text_file` variants
//!   default to off).
//! - **Auto-vivification**: reading a missing file creates it, together with
//!   its directory chain, from a caller-supplied seed.
//!
//! Existence checks never fail for I/O reasons, and directory listings skip
//! hidden entries.
//!
//! # Example
//!
//! ```rust,ignore
//! use iowa::{AccessOptions, Content, Iowa};
//! use serde_json::json;
//!
//! let iowa = Iowa::local();
//!
//! // Creates `state/` and `state/counter.json` on first access.
//! let options = AccessOptions::new().with_seed(json!({"count": 0}));
//! let counter = iowa.read_file("state/counter.json", &options).await?;
//! assert_eq!(counter, Content::Json(json!({"count": 0})));
//!
//! iowa.write_file("state/counter.json", json!({"count": 1}), &AccessOptions::new()).await?;
//! ```
//!
//! The crate-level functions ([`read_file`], [`write_file`], ...) do the same
//! against the local filesystem without building an [`Iowa`] first.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use bytes::Bytes;
pub use iowa_storage::{
    EntryKind, EntryStat, InMemoryStorage, LocalDiskStorage, Storage, StorageError,
};

pub mod codec;
mod content;
mod directories;
mod encoding;
mod error;
mod exists;
mod materialize;
mod ops;
mod options;
mod seed;

pub use content::Content;
pub use directories::DirectoryEntry;
pub use encoding::{Encoding, EncodingError};
pub use error::{BoxError, Error, Result};
pub use exists::ExistsResult;
pub use options::{AccessOptions, ResolvedOptions, DEFAULT_OPTIONS, TEXT_DEFAULT_OPTIONS};
pub use seed::CreationResult;

/// File access over a storage backend.
///
/// Holds nothing but the backend; every call resolves its own options, so one
/// `Iowa` can be shared freely between tasks (wrap the backend in an `Arc`, or
/// borrow it, to share it with other code).
#[derive(Debug, Clone, Default)]
pub struct Iowa<S = LocalDiskStorage> {
    storage: S,
}

impl<S> Iowa<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl Iowa<LocalDiskStorage> {
    /// File access on the local filesystem, paths used as given.
    pub fn local() -> Self {
        Self::new(LocalDiskStorage::new())
    }

    /// File access on the local filesystem, relative paths resolved
    /// against `root`.
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self::new(LocalDiskStorage::rooted(root))
    }
}

pub(crate) fn require_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::empty_path());
    }
    Ok(())
}

// Local filesystem shorthands

/// See [`Iowa::read_file`].
pub async fn read_file(path: impl AsRef<Path>, options: &AccessOptions) -> Result<Content> {
    Iowa::local().read_file(path, options).await
}

/// See [`Iowa::read_text_file`].
pub async fn read_text_file(path: impl AsRef<Path>, options: &AccessOptions) -> Result<Content> {
    Iowa::local().read_text_file(path, options).await
}

/// See [`Iowa::read_json`].
pub async fn read_json<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    options: &AccessOptions,
) -> Result<T> {
    Iowa::local().read_json(path, options).await
}

/// See [`Iowa::read_binary`].
pub async fn read_binary(path: impl AsRef<Path>) -> Result<Bytes> {
    Iowa::local().read_binary(path).await
}

/// See [`Iowa::write_file`].
pub async fn write_file(
    path: impl AsRef<Path>,
    data: impl Into<Content>,
    options: &AccessOptions,
) -> Result<Content> {
    Iowa::local().write_file(path, data, options).await
}

/// See [`Iowa::write_text_file`].
pub async fn write_text_file(
    path: impl AsRef<Path>,
    data: impl Into<Content>,
    options: &AccessOptions,
) -> Result<Content> {
    Iowa::local().write_text_file(path, data, options).await
}

/// See [`Iowa::write_json`].
pub async fn write_json<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
    options: &AccessOptions,
) -> Result<Content> {
    Iowa::local().write_json(path, value, options).await
}

/// See [`Iowa::write_binary`].
pub async fn write_binary(path: impl AsRef<Path>, data: impl Into<Bytes>) -> Result<Bytes> {
    Iowa::local().write_binary(path, data).await
}

/// See [`Iowa::exists`].
pub async fn exists(path: impl AsRef<Path>) -> Result<ExistsResult> {
    Iowa::local().exists(path).await
}

/// See [`Iowa::exists_many`].
pub async fn exists_many<I, P>(paths: I) -> Vec<ExistsResult>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    Iowa::local().exists_many(paths).await
}

/// See [`Iowa::stat`].
pub async fn stat(path: impl AsRef<Path>) -> Result<EntryStat> {
    Iowa::local().stat(path).await
}

/// See [`Iowa::create_if_not_exists`].
pub async fn create_if_not_exists(
    path: impl AsRef<Path>,
    seed: impl Into<Content>,
    json: bool,
) -> Result<CreationResult> {
    Iowa::local().create_if_not_exists(path, seed, json).await
}

/// See [`Iowa::missing_files`].
pub async fn missing_files<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    Iowa::local().missing_files(paths).await
}

/// See [`Iowa::ensure_path`].
pub async fn ensure_path(path: impl AsRef<Path>) -> Result<()> {
    Iowa::local().ensure_path(path).await
}

/// See [`Iowa::directories`].
pub async fn directories(root: impl AsRef<Path>) -> Result<Vec<DirectoryEntry>> {
    Iowa::local().directories(root).await
}
