//! Object-store collaborator for bucket-mirror
//!
//! Defines the narrow [`ObjectStore`] interface the reconciliation engine
//! talks to and ships two buckets implementing it:
//!
//! - [`MemoryStore`]: in-process bucket for previews and tests
//! - [`DirectoryStore`]: a bucket laid out as files under a root directory
//!
//! Both list keys S3-v1 style: ascending key order, the marker means "start
//! after this key", and a page is truncated when more keys remain.

pub mod directory;
pub mod error;
mod listing;
pub mod memory;
pub mod store;

pub use directory::{DirectoryStore, OBJECT_SUFFIX};
pub use error::{Error, Result};
pub use memory::{MemoryStore, StoredObject};
pub use store::{
    CursorPolicy, DEFAULT_PAGE_SIZE, ListPage, ObjectReader, ObjectStore, ObjectSummary, PutObject,
};
