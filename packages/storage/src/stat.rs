//! Entry metadata returned by `Storage::stat_entry`.

use std::time::SystemTime;

use serde::Serialize;

/// What kind of entry a path denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// Metadata for a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryStat {
    pub kind: EntryKind,
    /// Size in bytes. Zero for directories in the in-memory store.
    pub len: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<SystemTime>,
    pub readonly: bool,
}

impl EntryStat {
    pub fn file(len: u64) -> Self {
        Self {
            kind: EntryKind::File,
            len,
            modified: None,
            readonly: false,
        }
    }

    pub fn directory() -> Self {
        Self {
            kind: EntryKind::Directory,
            len: 0,
            modified: None,
            readonly: false,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

impl From<&std::fs::Metadata> for EntryStat {
    fn from(metadata: &std::fs::Metadata) -> Self {
        let file_type = metadata.file_type();
        let kind = if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        };

        Self {
            kind,
            len: metadata.len(),
            modified: metadata.modified().ok(),
            readonly: metadata.permissions().readonly(),
        }
    }
}
