//! In-process bucket

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::listing::paginate;
use crate::{
    CursorPolicy, DEFAULT_PAGE_SIZE, Error, ListPage, ObjectReader, ObjectStore, ObjectSummary,
    PutObject, Result,
};

/// An object held by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub last_modified: DateTime<Utc>,
    pub content_type: String,
    pub acl: String,
}

/// Bucket kept entirely in memory.
///
/// Pagination behaviour is configurable so callers can reproduce stores that
/// omit the explicit continuation cursor.
#[derive(Debug)]
pub struct MemoryStore {
    bucket: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
    page_size: usize,
    emit_next_marker: bool,
    cursor_policy: CursorPolicy,
    list_requests: AtomicUsize,
}

impl MemoryStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
            page_size: DEFAULT_PAGE_SIZE,
            emit_next_marker: true,
            cursor_policy: CursorPolicy::default(),
            list_requests: AtomicUsize::new(0),
        }
    }

    /// Keys per listing page (at least 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Never send `next_marker`, like S3 v1 listings without a delimiter.
    pub fn without_next_marker(mut self) -> Self {
        self.emit_next_marker = false;
        self
    }

    pub fn with_cursor_policy(mut self, policy: CursorPolicy) -> Self {
        self.cursor_policy = policy;
        self
    }

    /// Seed an object with an explicit modification time.
    pub fn insert(
        &self,
        key: impl Into<String>,
        body: impl Into<Vec<u8>>,
        last_modified: DateTime<Utc>,
    ) {
        self.lock().insert(
            key.into(),
            StoredObject {
                body: body.into(),
                last_modified,
                content_type: mirror_fs::DEFAULT_CONTENT_TYPE.to_string(),
                acl: "private".to_string(),
            },
        );
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.lock().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of `list_objects` calls served so far.
    pub fn list_requests(&self) -> usize {
        self.list_requests.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn cursor_policy(&self) -> CursorPolicy {
        self.cursor_policy
    }

    async fn list_objects(&self, marker: Option<&str>) -> Result<ListPage> {
        self.list_requests.fetch_add(1, Ordering::SeqCst);
        let objects = self.lock();
        let summaries = objects.iter().map(|(key, object)| ObjectSummary {
            key: key.clone(),
            size: object.body.len() as u64,
            last_modified: object.last_modified,
        });
        Ok(paginate(
            summaries,
            marker,
            self.page_size,
            self.emit_next_marker,
        ))
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

        self.lock().insert(
            request.key,
            StoredObject {
                body: request.body,
                last_modified: Utc::now(),
                content_type: request.content_type,
                acl: request.acl,
            },
        );
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<ObjectReader> {
        let body = self
            .lock()
            .get(key)
            .map(|object| object.body.clone())
            .ok_or_else(|| Error::NoSuchKey {
                bucket: self.bucket.clone(),
                key: key.to_string(),
            })?;
        Ok(Box::new(std::io::Cursor::new(body)))
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}
