//! In-memory storage for tests and deterministic behavior.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{EntryStat, Result, Storage, StorageError};

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<PathBuf, Bytes>,
    dirs: BTreeSet<PathBuf>,
    poisoned: HashSet<PathBuf>,
}

impl State {
    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || self.dirs.contains(path)
    }

    fn check_poisoned(&self, key: &Path, path: &Path) -> Result<()> {
        if self.poisoned.contains(key) {
            return Err(StorageError::io(
                path,
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        Ok(())
    }
}

/// A storage tree held entirely in memory.
///
/// Behaves like a disk where it matters to callers: files need an existing
/// parent directory, files and directories cannot stand in for each other,
/// and listings only show direct children. Paths are normalized, so
/// `/a/./b` and `a/b` name the same entry. The root always exists.
///
/// # Example
///
/// ```rust,ignore
/// use iowa_storage::{InMemoryStorage, Storage};
/// use bytes::Bytes;
/// use std::path::Path;
///
/// let store = InMemoryStorage::new();
/// store.ensure_directory_chain(Path::new("users")).await?;
/// store.write_raw(Path::new("users/alice"), Bytes::from_static(b"{}")).await?;
/// assert!(store.probe_exists(Path::new("users/alice")).await);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: Mutex<State>,
}

impl InMemoryStorage {
    /// Create an empty store containing only the root directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file directly, creating its parent directories.
    pub fn insert_file(&self, path: impl AsRef<Path>, data: impl Into<Bytes>) {
        let key = normalize(path.as_ref());
        let mut state = self.lock_state();
        for ancestor in key.ancestors().skip(1) {
            if !ancestor.as_os_str().is_empty() {
                state.dirs.insert(ancestor.to_path_buf());
            }
        }
        state.files.insert(key, data.into());
    }

    /// Make every primitive that touches `path` fail with a
    /// `PermissionDenied` I/O error.
    pub fn poison(&self, path: impl AsRef<Path>) {
        let key = normalize(path.as_ref());
        self.lock_state().poisoned.insert(key);
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave the maps half-updated.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    normalized
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn read_raw(&self, path: &Path) -> Result<Bytes> {
        let key = normalize(path);
        let state = self.lock_state();
        state.check_poisoned(&key, path)?;

        if let Some(content) = state.files.get(&key) {
            return Ok(content.clone());
        }
        if state.is_dir(&key) {
            return Err(StorageError::io(
                path,
                io::ErrorKind::Other,
                "is a directory",
            ));
        }
        Err(StorageError::NotFound {
            path: path.to_path_buf(),
        })
    }

    async fn write_raw(&self, path: &Path, data: Bytes) -> Result<()> {
        let key = normalize(path);
        let mut state = self.lock_state();
        state.check_poisoned(&key, path)?;

        if state.is_dir(&key) {
            return Err(StorageError::io(
                path,
                io::ErrorKind::Other,
                "is a directory",
            ));
        }

        let parent = key.parent().unwrap_or_else(|| Path::new(""));
        if !state.is_dir(parent) {
            if state.files.contains_key(parent) {
                return Err(StorageError::io(
                    path,
                    io::ErrorKind::Other,
                    "not a directory",
                ));
            }
            return Err(StorageError::NotFound {
                path: path.to_path_buf(),
            });
        }

        state.files.insert(key, data);
        Ok(())
    }

    async fn probe_exists(&self, path: &Path) -> bool {
        let key = normalize(path);
        let state = self.lock_state();
        if state.poisoned.contains(&key) {
            return false;
        }
        state.files.contains_key(&key) || state.is_dir(&key)
    }

    async fn stat_entry(&self, path: &Path) -> Result<EntryStat> {
        let key = normalize(path);
        let state = self.lock_state();
        state.check_poisoned(&key, path)?;

        if let Some(content) = state.files.get(&key) {
            return Ok(EntryStat::file(content.len() as u64));
        }
        if state.is_dir(&key) {
            return Ok(EntryStat::directory());
        }
        Err(StorageError::NotFound {
            path: path.to_path_buf(),
        })
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        let key = normalize(path);
        let state = self.lock_state();
        state.check_poisoned(&key, path)?;

        if !state.is_dir(&key) {
            if state.files.contains_key(&key) {
                return Err(StorageError::io(
                    path,
                    io::ErrorKind::Other,
                    "not a directory",
                ));
            }
            return Err(StorageError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let names: BTreeSet<String> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|entry| entry.parent() == Some(key.as_path()))
            .filter_map(|entry| entry.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();

        Ok(names.into_iter().collect())
    }

    async fn ensure_directory_chain(&self, path: &Path) -> Result<()> {
        let key = normalize(path);
        let mut state = self.lock_state();
        state.check_poisoned(&key, path)?;

        let mut chain: Vec<&Path> = key
            .ancestors()
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .collect();
        chain.reverse();

        for ancestor in chain {
            if state.files.contains_key(ancestor) {
                return Err(StorageError::io(
                    path,
                    io::ErrorKind::Other,
                    "not a directory",
                ));
            }
            state.dirs.insert(ancestor.to_path_buf());
        }

        Ok(())
    }
}
