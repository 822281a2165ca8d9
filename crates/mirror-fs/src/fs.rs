//! Async filesystem interface used by the reconciliation engine
//!
//! The engine never touches `std::fs` or `tokio::fs` directly. It goes through
//! [`FileSystem`] so scans and downloads can be exercised against injected
//! failures.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

use crate::{Error, HIDDEN_MARKER, Result, io};

/// Kind of a directory entry, determined without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Symlinks, sockets, devices, fifos
    Other,
}

/// Result of [`FileSystem::stat`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub kind: EntryKind,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl FileStat {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Filesystem primitives consumed by the engine
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Stat `path` without following symlinks.
    async fn stat(&self, path: &Path) -> Result<FileStat>;

    /// Names of the entries in the directory at `path`, in ascending order.
    ///
    /// Hidden names that are not valid UTF-8 are omitted; any other
    /// non-UTF-8 name is an error.
    async fn read_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Read the whole file at `path`.
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Stream `reader` into a file at `path`, replacing it atomically.
    async fn write_from(
        &self,
        path: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<u64>;

    /// Create the directory at `path` and all missing parents.
    async fn ensure_dir(&self, path: &Path) -> Result<()>;
}

/// [`FileSystem`] backed by the local disk through `tokio::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for LocalFs {
    async fn stat(&self, path: &Path) -> Result<FileStat> {
        let meta = tokio::fs::symlink_metadata(path)
            .await
            .map_err(|e| Error::io(path, e))?;
        let file_type = meta.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        let modified = meta.modified().map_err(|e| Error::io(path, e))?;

        Ok(FileStat {
            kind,
            size: meta.len(),
            modified: DateTime::<Utc>::from(modified),
        })
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .map_err(|e| Error::io(path, e))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| Error::io(path, e))? {
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                // Hidden entries are never mirrored, whatever their encoding.
                Err(raw) if raw.as_encoded_bytes().first() == Some(&(HIDDEN_MARKER as u8)) => {}
                Err(_) => {
                    return Err(Error::NonUtf8Name {
                        path: path.to_path_buf(),
                    });
                }
            }
        }
        names.sort();

        tracing::debug!(path = %path.display(), entries = names.len(), "listed directory");
        Ok(names)
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| Error::io(path, e))
    }

    async fn write_from(
        &self,
        path: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<u64> {
        io::write_stream_atomic(path, reader).await
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| Error::io(path, e))
    }
}
