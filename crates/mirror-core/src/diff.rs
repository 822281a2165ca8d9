//! Diff engine
//!
//! Compares a local and a remote [`FileIndex`] using size and modification
//! time only. Content is never hashed, so equal size with a remote copy at
//! least as new as the local one counts as in sync.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::index::{FileIndex, FileRecord};

/// Action required for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    Upload,
    Delete,
}

/// Why a path needs an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffReason {
    /// Not in the bucket yet
    New,
    /// Sizes differ
    Size,
    /// Local copy is newer
    Modified,
    /// Gone from the local tree
    Missing,
}

impl DiffReason {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::New => "not in bucket",
            Self::Size => "size differs",
            Self::Modified => "local copy is newer",
            Self::Missing => "missing locally",
        }
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl fmt::Display for DiffReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// One required action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub path: String,
    pub status: DiffStatus,
    pub reason: DiffReason,
}

/// Set of actions that reconciles the bucket with the local tree.
///
/// Enumerates in insertion order: uploads (local path order) first, then
/// deletes (remote path order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSet {
    entries: Vec<DiffEntry>,
    positions: BTreeMap<String, usize>,
}

impl DiffSet {
    fn push(&mut self, path: &str, status: DiffStatus, reason: DiffReason) {
        debug_assert!(!self.positions.contains_key(path), "duplicate diff path {path}");
        self.positions.insert(path.to_string(), self.entries.len());
        self.entries.push(DiffEntry {
            path: path.to_string(),
            status,
            reason,
        });
    }

    pub fn get(&self, path: &str) -> Option<&DiffEntry> {
        self.positions.get(path).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.positions.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffEntry> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn uploads(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == DiffStatus::Upload)
    }

    pub fn deletes(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| e.status == DiffStatus::Delete)
    }
}

impl<'a> IntoIterator for &'a DiffSet {
    type Item = &'a DiffEntry;
    type IntoIter = std::slice::Iter<'a, DiffEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for DiffSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

/// Why `local` must be uploaded over `remote`, or `None` when in sync.
pub fn compare(local: &FileRecord, remote: Option<&FileRecord>) -> Option<DiffReason> {
    let Some(remote) = remote else {
        return Some(DiffReason::New);
    };
    if local.size != remote.size {
        Some(DiffReason::Size)
    } else if local.modified > remote.modified {
        Some(DiffReason::Modified)
    } else {
        None
    }
}

/// Compute the actions that make `remote` mirror `local`.
pub fn diff(local: &FileIndex, remote: &FileIndex) -> DiffSet {
    let mut set = DiffSet::default();

    for record in local {
        if let Some(reason) = compare(record, remote.get(&record.path)) {
            set.push(&record.path, DiffStatus::Upload, reason);
        }
    }

    for record in remote {
        if !local.contains(&record.path) {
            set.push(&record.path, DiffStatus::Delete, DiffReason::Missing);
        }
    }

    set
}
