//! ObjectStore trait and request/response types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;

use crate::Result;

/// Keys returned per listing page unless a store is configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Streamed object body returned by [`ObjectStore::get_object`].
pub type ObjectReader = Box<dyn AsyncRead + Send + Unpin>;

/// One entry of a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// One page of a bucket listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub items: Vec<ObjectSummary>,
    /// More keys remain after this page
    pub is_truncated: bool,
    /// Explicit continuation cursor, when the store provides one
    pub next_marker: Option<String>,
}

/// Upload request
#[derive(Debug, Clone)]
pub struct PutObject {
    pub key: String,
    pub body: Vec<u8>,
    /// Declared content length; must match `body`
    pub size: u64,
    pub content_type: String,
    pub acl: String,
}

/// How the next listing marker is derived when a page is truncated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CursorPolicy {
    /// Only trust `next_marker`; a truncated page without one is an error.
    NextMarkerOnly,
    /// Use `next_marker`, else the key of the last item on the page.
    #[default]
    NextMarkerOrLastKey,
}

/// Object-store transport for a single bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store is bound to.
    fn bucket(&self) -> &str;

    /// Pagination dialect of this store.
    fn cursor_policy(&self) -> CursorPolicy {
        CursorPolicy::NextMarkerOrLastKey
    }

    /// List keys strictly after `marker` (or from the start).
    async fn list_objects(&self, marker: Option<&str>) -> Result<ListPage>;

    async fn put_object(&self, request: PutObject) -> Result<()>;

    async fn get_object(&self, key: &str) -> Result<ObjectReader>;

    /// Delete `key`. Deleting a missing key succeeds.
    async fn delete_object(&self, key: &str) -> Result<()>;
}
