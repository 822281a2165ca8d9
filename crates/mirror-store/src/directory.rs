//! Bucket stored as plain files under a root directory
//!
//! Layout: `<root>/<bucket>/<key>~obj`, with `/` in keys mapped to
//! directories and [`OBJECT_SUFFIX`] appended to the file holding each object.
//! The suffix keeps object files and key-prefix directories apart, so `docs`
//! and `docs/index.html` can live in one bucket. Keys with a directory segment
//! ending in the suffix are rejected. Object metadata other than size and
//! modification time (content type, ACL) is not persisted.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mirror_fs::io::{is_staging_name, write_atomic};
use mirror_fs::path::path_to_key;
use mirror_fs::{KEY_SEPARATOR, key_to_path};
use walkdir::WalkDir;

use crate::listing::paginate;
use crate::{
    DEFAULT_PAGE_SIZE, Error, ListPage, ObjectReader, ObjectStore, ObjectSummary, PutObject,
    Result,
};

/// Appended to the file name of every stored object
pub const OBJECT_SUFFIX: &str = "~obj";

/// Bucket backed by a directory tree
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    bucket: String,
    bucket_dir: PathBuf,
    page_size: usize,
}

impl DirectoryStore {
    /// Bind to bucket `bucket` below `root`.
    pub fn new(root: impl AsRef<Path>, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let bucket_dir = root.as_ref().join(&bucket);
        Self {
            bucket,
            bucket_dir,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn bucket_dir(&self) -> &Path {
        &self.bucket_dir
    }

    /// Create the bucket directory if it does not exist yet.
    pub async fn create_bucket(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.bucket_dir)
            .await
            .map_err(|e| mirror_fs::Error::io(&self.bucket_dir, e))?;
        Ok(())
    }

    fn object_path(&self, key: &str) -> Result<PathBuf> {
        let path = key_to_path(&self.bucket_dir, key)?;
        if has_reserved_dir(key) {
            return Err(mirror_fs::Error::invalid_key(
                key,
                "directory segment ends with the reserved object suffix",
            )
            .into());
        }
        let mut name = path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| mirror_fs::Error::invalid_key(key, "key has no file name"))?;
        name.push(OBJECT_SUFFIX);
        Ok(path.with_file_name(name))
    }

    /// Remove now-empty directories between `path` and the bucket directory.
    async fn prune_empty_parents(&self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.bucket_dir || !dir.starts_with(&self.bucket_dir) {
                break;
            }
            // Fails on non-empty directories, which ends the walk.
            if tokio::fs::remove_dir(dir).await.is_err() {
                break;
            }
            current = dir.parent();
        }
    }
}

fn has_reserved_dir(key: &str) -> bool {
    key.rsplit_once(KEY_SEPARATOR).is_some_and(|(dirs, _)| {
        dirs.split(KEY_SEPARATOR)
            .any(|segment| segment.ends_with(OBJECT_SUFFIX))
    })
}

/// Every object in the bucket, sorted by key.
fn collect_objects(bucket_dir: &Path) -> Result<Vec<ObjectSummary>> {
    let mut objects = Vec::new();
    for entry in WalkDir::new(bucket_dir).follow_links(false).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(bucket_dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            mirror_fs::Error::io(path, source)
        })?;

        if !entry.file_type().is_file() || is_staging_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        let Some(key) = path_to_key(bucket_dir, entry.path())
            .and_then(|stored| stored.strip_suffix(OBJECT_SUFFIX).map(str::to_string))
            .filter(|key| !key.is_empty() && !has_reserved_dir(key))
        else {
            continue;
        };
        let meta = entry
            .metadata()
            .map_err(|e| {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("metadata unavailable"));
                mirror_fs::Error::io(entry.path(), source)
            })?;
        let modified = meta
            .modified()
            .map_err(|e| mirror_fs::Error::io(entry.path(), e))?;

        objects.push(ObjectSummary {
            key,
            size: meta.len(),
            last_modified: DateTime::<Utc>::from(modified),
        });
    }
    objects.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(objects)
}

#[async_trait]
impl ObjectStore for DirectoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_objects(&self, marker: Option<&str>) -> Result<ListPage> {
        if !tokio::fs::try_exists(&self.bucket_dir).await.unwrap_or(false) {
            return Err(Error::NoSuchBucket {
                bucket: self.bucket.clone(),
            });
        }

        let bucket_dir = self.bucket_dir.clone();
        let objects = tokio::task::spawn_blocking(move || collect_objects(&bucket_dir))
            .await
            .map_err(|e| Error::ListingTask {
                message: e.to_string(),
            })??;

        let page = paginate(objects, marker, self.page_size, true);
        tracing::debug!(
            bucket = %self.bucket,
            marker = ?marker,
            items = page.items.len(),
            truncated = page.is_truncated,
            "listed objects"
        );
        Ok(page)
    }

    async fn put_object(&self, request: PutObject) -> Result<()> {
        let actual = request.body.len() as u64;
        if actual != request.size {
            return Err(Error::SizeMismatch {
                key: request.key,
                declared: request.size,
                actual,
            });
        }

        let path = self.object_path(&request.key)?;
        write_atomic(&path, &request.body).await?;
        tracing::debug!(
            bucket = %self.bucket,
            key = %request.key,
            bytes = actual,
            content_type = %request.content_type,
            acl = %request.acl,
            "stored object"
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<ObjectReader> {
        let path = self.object_path(key)?;
        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NoSuchKey {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            }),
            Err(e) => Err(mirror_fs::Error::io(path, e).into()),
        }
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        let path = self.object_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                self.prune_empty_parents(&path).await;
                tracing::debug!(bucket = %self.bucket, key = %key, "deleted object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(mirror_fs::Error::io(path, e).into()),
        }
    }
}
