//! Error types for the storage layer.
//!
//! Errors at this level are transport-focused: an entry is either absent, or
//! the underlying I/O failed for some other reason. Semantic errors (bad
//! paths, codec failures) belong in higher layers.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors at the storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The entry does not exist.
    #[error("no such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    /// Any other I/O failure, with the original cause preserved.
    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classify an `io::Error` raised while touching `path`.
    pub fn from_io(path: impl AsRef<Path>, error: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if error.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound { path }
        } else {
            StorageError::Io {
                path,
                source: error,
            }
        }
    }

    /// Build an `Io` error of the given kind.
    pub fn io(path: impl AsRef<Path>, kind: io::ErrorKind, message: &str) -> Self {
        StorageError::Io {
            path: path.as_ref().to_path_buf(),
            source: io::Error::new(kind, message.to_string()),
        }
    }

    /// Returns `true` if the entry was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    /// The path the failing operation touched.
    pub fn path(&self) -> &Path {
        match self {
            StorageError::NotFound { path } | StorageError::Io { path, .. } => path,
        }
    }

    /// The `io::ErrorKind` this error corresponds to.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            StorageError::NotFound { .. } => io::ErrorKind::NotFound,
            StorageError::Io { source, .. } => source.kind(),
        }
    }
}

/// Result alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
