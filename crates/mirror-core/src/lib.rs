//! Reconciliation engine for bucket-mirror
//!
//! Mirrors a local directory tree into a flat object-store bucket (or the
//! bucket back into the directory):
//!
//! - **Scanners**: build a [`FileIndex`] for the local tree and for the bucket
//! - **Diff engine**: classify every path as upload, delete or in sync
//! - **Runner**: apply per-path actions strictly one at a time, stopping at the
//!   first failure
//! - **Reconciler**: drives all of the above and reports progress through an
//!   injected [`Observer`]
//!
//! # Architecture
//!
//! ```text
//!                 mirror-cli
//!                     |
//!                mirror-core
//!                     |
//!          +----------+----------+
//!          |                     |
//!      mirror-fs            mirror-store
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mirror_core::{Event, Reconciler};
//! use mirror_store::MemoryStore;
//!
//! fn print_event(event: &Event<'_>) {
//!     println!("{}", event.name());
//! }
//!
//! # async fn run() -> mirror_core::Result<()> {
//! let store = Arc::new(MemoryStore::new("www"));
//! let reconciler = Reconciler::new("./site", store).with_observer(Arc::new(print_event));
//! let report = reconciler.sync().await?;
//! println!("{} actions applied", report.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod events;
pub mod index;
pub mod reconcile;
pub mod runner;
pub mod scan;

pub use config::{Credentials, DEFAULT_ACL, MirrorConfig, StoreConfig};
pub use diff::{DiffEntry, DiffReason, DiffSet, DiffStatus, diff};
pub use error::{Error, Result};
pub use events::{Event, Observer, Side, Silent};
pub use index::{FileIndex, FileRecord};
pub use reconcile::{ApplyReport, Reconciler};
pub use runner::{Interrupted, fold_sequential, for_each_sequential};
pub use scan::{scan_local, scan_remote};
