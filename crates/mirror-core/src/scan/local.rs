//! Local tree scanner

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use mirror_fs::{EntryKind, FileSystem, HIDDEN_MARKER, join_key, resolve_key};

use crate::Result;
use crate::index::{FileIndex, FileRecord};
use crate::runner::fold_sequential;

type ScanFuture<'a> = Pin<Box<dyn Future<Output = Result<FileIndex>> + Send + 'a>>;

/// Index every regular file below `root`.
///
/// Hidden entries are neither recorded nor descended into; symlinks and
/// special files are skipped. Entries of one directory are visited one at a
/// time, depth-first. Any stat or listing failure aborts the whole scan.
pub async fn scan_local(fs: &dyn FileSystem, root: &Path) -> Result<FileIndex> {
    scan_dir(fs, root, String::new(), FileIndex::new()).await
}

// Boxed so the directory recursion has a finite future type.
fn scan_dir<'a>(
    fs: &'a dyn FileSystem,
    root: &'a Path,
    dir_key: String,
    index: FileIndex,
) -> ScanFuture<'a> {
    Box::pin(scan_entries(fs, root, dir_key, index))
}

async fn scan_entries(
    fs: &dyn FileSystem,
    root: &Path,
    dir_key: String,
    index: FileIndex,
) -> Result<FileIndex> {
    let names = fs.read_dir(&resolve_key(root, &dir_key)).await?;
    let parent = dir_key.as_str();

    fold_sequential(names, index, |index, _, name| {
        visit(fs, root, join_key(parent, &name), index)
    })
    .await
    .map_err(|interrupted| interrupted.into_error())
}

async fn visit(
    fs: &dyn FileSystem,
    root: &Path,
    key: String,
    mut index: FileIndex,
) -> Result<FileIndex> {
    let is_hidden = key
        .rsplit('/')
        .next()
        .is_some_and(|name| name.starts_with(HIDDEN_MARKER));
    if is_hidden {
        return Ok(index);
    }

    let stat = fs.stat(&resolve_key(root, &key)).await?;
    match stat.kind {
        EntryKind::Directory => scan_dir(fs, root, key, index).await,
        EntryKind::File => {
            index.insert(FileRecord::new(key, stat.size, stat.modified));
            Ok(index)
        }
        EntryKind::Other => Ok(index),
    }
}
