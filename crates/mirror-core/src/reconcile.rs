//! Reconciler
//!
//! Drives scanners, diff engine and runner for the three entry points:
//! - **sync**: make the bucket mirror the directory
//! - **upload_dir**: upload every local file unconditionally
//! - **download_dir**: download every bucket key unconditionally

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mirror_fs::{FileSystem, LocalFs, guess_content_type, key_to_path, resolve_key};
use mirror_store::{ObjectStore, PutObject};
use serde::Serialize;

use crate::config::DEFAULT_ACL;
use crate::diff::{DiffEntry, DiffSet, DiffStatus, diff};
use crate::events::{Event, Observer, Side, Silent};
use crate::index::FileIndex;
use crate::runner::{Interrupted, for_each_sequential};
use crate::scan::{scan_local, scan_remote};
use crate::{Error, Result};

/// Paths whose action completed, in the order they ran
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<String>,
}

impl ApplyReport {
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Engine mirroring one directory against one bucket
pub struct Reconciler {
    root: PathBuf,
    acl: String,
    store: Arc<dyn ObjectStore>,
    fs: Arc<dyn FileSystem>,
    observer: Arc<dyn Observer>,
}

impl Reconciler {
    /// Create a reconciler for `root` and `store` using the local disk, the
    /// default ACL and no observer.
    pub fn new(root: impl Into<PathBuf>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            root: root.into(),
            acl: DEFAULT_ACL.to_string(),
            store,
            fs: Arc::new(LocalFs::new()),
            observer: Arc::new(Silent),
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_acl(mut self, acl: impl Into<String>) -> Self {
        self.acl = acl.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn acl(&self) -> &str {
        &self.acl
    }

    pub fn bucket(&self) -> &str {
        self.store.bucket()
    }

    fn emit(&self, event: Event<'_>) {
        self.observer.notify(&event);
    }

    /// Scan the local tree.
    pub async fn scan_local(&self) -> Result<FileIndex> {
        self.emit(Event::ScanStarted(Side::Local));
        let index = scan_local(self.fs.as_ref(), &self.root).await?;
        self.emit(Event::Directory(&index));
        Ok(index)
    }

    /// Scan the bucket.
    pub async fn scan_remote(&self) -> Result<FileIndex> {
        self.emit(Event::ScanStarted(Side::Remote));
        let index = scan_remote(self.store.as_ref()).await?;
        self.emit(Event::Bucket(&index));
        Ok(index)
    }

    /// Scan both sides and compute the actions a sync would take.
    pub async fn diff(&self) -> Result<DiffSet> {
        let local = self.scan_local().await?;
        let remote = self.scan_remote().await?;
        let set = diff(&local, &remote);
        self.emit(Event::Diff(&set));
        Ok(set)
    }

    /// Make the bucket mirror the local tree.
    pub async fn sync(&self) -> Result<ApplyReport> {
        let set = self.diff().await?;
        self.apply(&set).await
    }

    /// Apply `set` in its enumeration order, stopping at the first failure.
    pub async fn apply(&self, set: &DiffSet) -> Result<ApplyReport> {
        let outcome = for_each_sequential(set, |_, entry| self.apply_entry(entry)).await;
        finish(outcome, set.paths().collect())
    }

    /// Upload every local file, whatever the bucket holds.
    pub async fn upload_dir(&self) -> Result<ApplyReport> {
        let local = self.scan_local().await?;
        let outcome = for_each_sequential(local.paths(), |_, path| self.upload_file(path)).await;
        finish(outcome, local.paths().collect())
    }

    /// Download every bucket key, whatever the local tree holds.
    pub async fn download_dir(&self) -> Result<ApplyReport> {
        let remote = self.scan_remote().await?;
        let outcome =
            for_each_sequential(remote.paths(), |_, path| self.download_file(path)).await;
        finish(outcome, remote.paths().collect())
    }

    async fn apply_entry(&self, entry: &DiffEntry) -> Result<()> {
        match entry.status {
            DiffStatus::Delete => self.remove_file(&entry.path).await,
            DiffStatus::Upload => self.upload_file(&entry.path).await,
        }
    }

    /// Upload the local file at relative `path` to the key `path`.
    pub async fn upload_file(&self, path: &str) -> Result<()> {
        let source = resolve_key(&self.root, path);
        let stat = self.fs.stat(&source).await?;
        let body = self.fs.read_file(&source).await?;
        let content_type = guess_content_type(path);

        self.emit(Event::Upload {
            path,
            content_type: &content_type,
            size: stat.size,
        });

        self.store
            .put_object(PutObject {
                key: path.to_string(),
                body,
                size: stat.size,
                content_type,
                acl: self.acl.clone(),
            })
            .await?;
        Ok(())
    }

    /// Delete the key `path` from the bucket.
    pub async fn remove_file(&self, path: &str) -> Result<()> {
        self.emit(Event::Remove { path });
        self.store.delete_object(path).await?;
        Ok(())
    }

    /// Download the key `path` into the local tree.
    pub async fn download_file(&self, path: &str) -> Result<()> {
        let target = key_to_path(&self.root, path)?;

        self.emit(Event::Download { path });

        let mut reader = self.store.get_object(path).await?;
        if let Some(parent) = target.parent() {
            self.fs.ensure_dir(parent).await?;
        }
        self.fs.write_from(&target, &mut *reader).await?;
        Ok(())
    }
}

/// Turn a runner outcome over `paths` into a report or an interruption error.
fn finish(
    outcome: std::result::Result<usize, Interrupted<Error>>,
    paths: Vec<&str>,
) -> Result<ApplyReport> {
    match outcome {
        Ok(ran) => Ok(ApplyReport {
            applied: paths[..ran].iter().map(|p| p.to_string()).collect(),
        }),
        Err(Interrupted { index, error }) => Err(Error::Interrupted {
            path: paths.get(index).map(|p| p.to_string()).unwrap_or_default(),
            applied: paths[..index].iter().map(|p| p.to_string()).collect(),
            source: Box::new(error),
        }),
    }
}
