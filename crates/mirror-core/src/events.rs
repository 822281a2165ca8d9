//! Progress notifications
//!
//! The engine never logs. Every state transition is reported as an [`Event`]
//! to the injected [`Observer`]; observers cannot influence control flow.

use crate::diff::DiffSet;
use crate::index::FileIndex;

/// Which side of the mirror a scan covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The local directory tree
    Local,
    /// The bucket
    Remote,
}

/// A state transition of a reconciliation run
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    ScanStarted(Side),
    /// Local scan finished
    Directory(&'a FileIndex),
    /// Bucket scan finished
    Bucket(&'a FileIndex),
    Diff(&'a DiffSet),
    Remove {
        path: &'a str,
    },
    Upload {
        path: &'a str,
        content_type: &'a str,
        size: u64,
    },
    Download {
        path: &'a str,
    },
}

impl Event<'_> {
    /// Short name of the event kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScanStarted(_) => "scan-started",
            Self::Directory(_) => "directory",
            Self::Bucket(_) => "bucket",
            Self::Diff(_) => "diff",
            Self::Remove { .. } => "remove",
            Self::Upload { .. } => "upload",
            Self::Download { .. } => "download",
        }
    }
}

/// Receiver of progress notifications
pub trait Observer: Send + Sync {
    fn notify(&self, event: &Event<'_>);
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Observer for Silent {
    fn notify(&self, _event: &Event<'_>) {}
}

impl<F> Observer for F
where
    F: Fn(&Event<'_>) + Send + Sync,
{
    fn notify(&self, event: &Event<'_>) {
        self(event)
    }
}
