//! Atomic write operations

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::{Error, HIDDEN_MARKER, Result};

const STAGING_SUFFIX: &str = ".tmp";

/// Path of the temporary file used while writing `target`.
///
/// The staging file lives in the same directory (same filesystem, so the final
/// rename is atomic) and starts with the hidden marker so scans skip it.
pub fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    target.with_file_name(format!(
        "{HIDDEN_MARKER}{name}.{}{STAGING_SUFFIX}",
        std::process::id()
    ))
}

/// Whether `name` looks like a staging file left by [`staging_path`].
pub fn is_staging_name(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER) && name.ends_with(STAGING_SUFFIX)
}

/// Stream `reader` into `path` atomically.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
/// Parent directories are created as needed. Returns the number of bytes
/// written.
pub async fn write_stream_atomic<R>(path: &Path, reader: &mut R) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = staging_path(path);
    let outcome = match copy_into(&temp_path, reader).await {
        Ok(written) => fs::rename(&temp_path, path)
            .await
            .map(|()| written)
            .map_err(|e| Error::io(path, e)),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(written) => {
            tracing::debug!(path = %path.display(), bytes = written, "wrote file");
            Ok(written)
        }
        Err(e) => {
            let _ = fs::remove_file(&temp_path).await;
            Err(e)
        }
    }
}

/// Write `content` to `path` atomically.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let mut reader = content;
    write_stream_atomic(path, &mut reader).await.map(|_| ())
}

async fn copy_into<R>(temp_path: &Path, reader: &mut R) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut file = File::create(temp_path)
        .await
        .map_err(|e| Error::io(temp_path, e))?;
    let written = tokio::io::copy(reader, &mut file)
        .await
        .map_err(|e| Error::io(temp_path, e))?;
    file.flush().await.map_err(|e| Error::io(temp_path, e))?;
    file.sync_all().await.map_err(|e| Error::io(temp_path, e))?;
    Ok(written)
}
