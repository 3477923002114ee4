//! Error types for file access operations.
//!
//! Every failure carries the underlying cause (available through
//! `std::error::Error::source`) and a human-readable reason naming the path.

use std::path::{Path, PathBuf};

use iowa_storage::StorageError;
use thiserror::Error;

use crate::CreationResult;

/// A boxed cause for failures that can originate from several layers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by file access operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument was rejected before any I/O happened.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The entry does not exist and was not (or could not be) created.
    #[error("{reason}")]
    NotFound {
        path: PathBuf,
        reason: String,
        #[source]
        source: StorageError,
    },

    /// File content could not be decoded.
    #[error("{reason}")]
    Decode {
        path: PathBuf,
        reason: String,
        #[source]
        source: BoxError,
    },

    /// Creating the directory chain, encoding the content, or writing failed.
    ///
    /// When the write was seeding a missing file, `creation` records that the
    /// file neither existed before nor got created.
    #[error("{reason}")]
    Write {
        path: PathBuf,
        reason: String,
        creation: Option<CreationResult>,
        #[source]
        source: BoxError,
    },

    /// Any other storage failure.
    #[error("{reason}")]
    UnexpectedIo {
        path: PathBuf,
        reason: String,
        #[source]
        source: StorageError,
    },
}

impl Error {
    pub(crate) fn empty_path() -> Self {
        Error::InvalidArgument {
            reason: "path must not be empty".to_string(),
        }
    }

    /// Classify a storage failure raised while reading or probing `path`.
    pub(crate) fn from_storage(path: &Path, source: StorageError) -> Self {
        if source.is_not_found() {
            Error::NotFound {
                path: path.to_path_buf(),
                reason: format!("File “{}” does not exist.", path.display()),
                source,
            }
        } else {
            Error::unexpected(path, source)
        }
    }

    pub(crate) fn unexpected(path: &Path, source: StorageError) -> Self {
        tracing::warn!("Unexpected storage failure at {}: {}", path.display(), source);
        Error::UnexpectedIo {
            path: path.to_path_buf(),
            reason: format!("File “{}” triggered an unexpected error.", path.display()),
            source,
        }
    }

    pub(crate) fn creation_disabled(path: &Path, source: StorageError) -> Self {
        Error::NotFound {
            path: path.to_path_buf(),
            reason: format!(
                "File “{}” does not exist, and force-creation is disabled.",
                path.display()
            ),
            source,
        }
    }

    pub(crate) fn listing(path: &Path, source: StorageError) -> Self {
        let reason = format!("Unable to list directory “{}”.", path.display());
        if source.is_not_found() {
            Error::NotFound {
                path: path.to_path_buf(),
                reason,
                source,
            }
        } else {
            Error::UnexpectedIo {
                path: path.to_path_buf(),
                reason,
                source,
            }
        }
    }

    pub(crate) fn decode(path: &Path, source: impl Into<BoxError>) -> Self {
        Error::Decode {
            path: path.to_path_buf(),
            reason: format!("Unable to decode “{}”.", path.display()),
            source: source.into(),
        }
    }

    pub(crate) fn write(path: &Path, source: impl Into<BoxError>) -> Self {
        Error::Write {
            path: path.to_path_buf(),
            reason: format!("Unable to write to path: “{}”.", path.display()),
            creation: None,
            source: source.into(),
        }
    }

    /// Mark a write failure as the outcome of seeding a missing file.
    pub(crate) fn seeding_failed(self) -> Self {
        match self {
            Error::Write {
                path,
                reason,
                source,
                ..
            } => Error::Write {
                path,
                reason,
                creation: Some(CreationResult {
                    existed_before: false,
                    created: false,
                }),
                source,
            },
            other => other,
        }
    }

    /// The human-readable reason for the failure.
    pub fn reason(&self) -> &str {
        match self {
            Error::InvalidArgument { reason }
            | Error::NotFound { reason, .. }
            | Error::Decode { reason, .. }
            | Error::Write { reason, .. }
            | Error::UnexpectedIo { reason, .. } => reason,
        }
    }

    /// The path the failing operation was working on, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::InvalidArgument { .. } => None,
            Error::NotFound { path, .. }
            | Error::Decode { path, .. }
            | Error::Write { path, .. }
            | Error::UnexpectedIo { path, .. } => Some(path),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// The seeding outcome carried by a failed auto-creation.
    pub fn creation(&self) -> Option<CreationResult> {
        match self {
            Error::Write { creation, .. } => *creation,
            _ => None,
        }
    }
}

/// Result alias for file access operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn not_found_storage_error_is_classified() {
        let source = StorageError::NotFound {
            path: PathBuf::from("a.json"),
        };
        let e = Error::from_storage(Path::new("a.json"), source);
        assert!(e.is_not_found());
        assert_eq!(e.reason(), "File “a.json” does not exist.");
        assert_eq!(e.path(), Some(Path::new("a.json")));
    }

    #[test]
    fn other_storage_error_is_unexpected() {
        let source = StorageError::io("a.json", io::ErrorKind::PermissionDenied, "denied");
        let e = Error::from_storage(Path::new("a.json"), source);
        assert!(matches!(e, Error::UnexpectedIo { .. }));
        assert!(StdError::source(&e).is_some());
        assert_eq!(
            format!("{}", e),
            "File “a.json” triggered an unexpected error."
        );
    }

    #[test]
    fn only_seeding_writes_carry_a_creation_result() {
        let source = StorageError::io("a.json", io::ErrorKind::PermissionDenied, "denied");
        let plain = Error::write(Path::new("a.json"), source);
        assert_eq!(plain.creation(), None);

        let seeded = plain.seeding_failed();
        assert_eq!(seeded.reason(), "Unable to write to path: “a.json”.");
        assert_eq!(
            seeded.creation(),
            Some(CreationResult {
                existed_before: false,
                created: false
            })
        );
        assert_eq!(Error::empty_path().seeding_failed().creation(), None);
    }

    #[test]
    fn creation_disabled_reason_names_path() {
        let source = StorageError::NotFound {
            path: PathBuf::from("missing.json"),
        };
        let e = Error::creation_disabled(Path::new("missing.json"), source);
        assert!(e.is_not_found());
        assert!(e.reason().contains("missing.json"));
        assert!(e.reason().contains("force-creation is disabled"));
    }

    #[test]
    fn write_error_keeps_cause() {
        let cause = io::Error::new(io::ErrorKind::Other, "disk full");
        let e = Error::write(Path::new("out.txt"), cause);
        assert_eq!(e.reason(), "Unable to write to path: “out.txt”.");
        let source = StdError::source(&e).unwrap();
        assert_eq!(source.to_string(), "disk full");
    }

    #[test]
    fn invalid_argument_has_no_path() {
        let e = Error::empty_path();
        assert!(e.path().is_none());
        assert!(format!("{}", e).starts_with("invalid argument"));
    }
}
