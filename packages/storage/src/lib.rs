//! Storage layer for iowa.
//!
//! This is the narrow waist underneath the file-access layer. Everything at
//! this level is raw bytes and plain metadata: no encodings, no JSON, no
//! auto-creation of missing files.
//!
//! Two implementations ship with the crate:
//! - [`LocalDiskStorage`] - the local filesystem through `tokio::fs`
//! - [`InMemoryStorage`] - an in-memory tree for tests
//!
//! Anything else (remote object stores, archives, ...) can plug in by
//! implementing [`Storage`].

pub use bytes::Bytes;

mod error;
mod in_memory;
mod local_disk;
mod stat;
mod traits;

pub use error::{Result, StorageError};
pub use in_memory::InMemoryStorage;
pub use local_disk::LocalDiskStorage;
pub use stat::{EntryKind, EntryStat};
pub use traits::Storage;
