//! Store and filesystem wrappers that fail on demand.
//!
//! Both wrappers forward to an inner implementation and record every call,
//! so tests can assert what ran before and after an injected failure.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use mirror_fs::{FileStat, FileSystem, LocalFs};
use mirror_store::{CursorPolicy, ListPage, ObjectReader, ObjectStore, PutObject};
use tokio::io::AsyncRead;

/// Store operation a [`FailingStore`] can fail on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    List,
    Put,
    Get,
    Delete,
}

impl StoreOp {
    fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Put => "put",
            Self::Get => "get",
            Self::Delete => "delete",
        }
    }
}

/// [`ObjectStore`] wrapper that fails one operation on one key.
///
/// Calls are recorded as `"<op>:<key>"` (`"list"` for listings), including
/// the failing call.
pub struct FailingStore {
    inner: Arc<dyn ObjectStore>,
    op: StoreOp,
    key: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FailingStore {
    /// Fail `op` whenever it targets `key`, or on every call when `key` is
    /// `None`.
    pub fn new(inner: Arc<dyn ObjectStore>, op: StoreOp, key: Option<&str>) -> Self {
        Self {
            inner,
            op,
            key: key.map(str::to_string),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded calls, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check(&self, op: StoreOp, key: Option<&str>) -> mirror_store::Result<()> {
        let call = match key {
            Some(key) => format!("{}:{key}", op.name()),
            None => op.name().to_string(),
        };
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());

        let targeted = match &self.key {
            Some(expected) => key == Some(expected.as_str()),
            None => true,
        };
        if op == self.op && targeted {
            return Err(mirror_store::Error::Backend {
                message: format!("injected failure on {call}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FailingStore {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    fn cursor_policy(&self) -> CursorPolicy {
        self.inner.cursor_policy()
    }

    async fn list_objects(&self, marker: Option<&str>) -> mirror_store::Result<ListPage> {
        self.check(StoreOp::List, None)?;
        self.inner.list_objects(marker).await
    }

    async fn put_object(&self, request: PutObject) -> mirror_store::Result<()> {
        self.check(StoreOp::Put, Some(&request.key))?;
        self.inner.put_object(request).await
    }

    async fn get_object(&self, key: &str) -> mirror_store::Result<ObjectReader> {
        self.check(StoreOp::Get, Some(key))?;
        self.inner.get_object(key).await
    }

    async fn delete_object(&self, key: &str) -> mirror_store::Result<()> {
        self.check(StoreOp::Delete, Some(key))?;
        self.inner.delete_object(key).await
    }
}

/// Filesystem operation a [`FailingFs`] can fail on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Stat,
    ReadDir,
    ReadFile,
    Write,
}

/// [`FileSystem`] over the local disk that fails one operation on one path.
///
/// Every call is recorded as `(op, path)`, including the failing one.
/// `ensure_dir` is neither failed nor recorded.
pub struct FailingFs {
    inner: LocalFs,
    fail: Option<(FsOp, PathBuf)>,
    calls: Mutex<Vec<(FsOp, PathBuf)>>,
}

impl FailingFs {
    pub fn new(op: FsOp, path: impl Into<PathBuf>) -> Self {
        Self {
            inner: LocalFs::new(),
            fail: Some((op, path.into())),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Forward everything and only record calls.
    pub fn recording() -> Self {
        Self {
            inner: LocalFs::new(),
            fail: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded calls, in order.
    pub fn calls(&self) -> Vec<(FsOp, PathBuf)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check(&self, op: FsOp, path: &Path) -> mirror_fs::Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((op, path.to_path_buf()));

        if self
            .fail
            .as_ref()
            .is_some_and(|(fail_op, fail_path)| *fail_op == op && fail_path == path)
        {
            return Err(mirror_fs::Error::io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FileSystem for FailingFs {
    async fn stat(&self, path: &Path) -> mirror_fs::Result<FileStat> {
        self.check(FsOp::Stat, path)?;
        self.inner.stat(path).await
    }

    async fn read_dir(&self, path: &Path) -> mirror_fs::Result<Vec<String>> {
        self.check(FsOp::ReadDir, path)?;
        self.inner.read_dir(path).await
    }

    async fn read_file(&self, path: &Path) -> mirror_fs::Result<Vec<u8>> {
        self.check(FsOp::ReadFile, path)?;
        self.inner.read_file(path).await
    }

    async fn write_from(
        &self,
        path: &Path,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> mirror_fs::Result<u64> {
        self.check(FsOp::Write, path)?;
        self.inner.write_from(path, reader).await
    }

    async fn ensure_dir(&self, path: &Path) -> mirror_fs::Result<()> {
        self.inner.ensure_dir(path).await
    }
}
