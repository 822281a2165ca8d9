//! [`TestTree`] builder for local directory scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Timestamp `secs` seconds after the Unix epoch.
///
/// # Panics
/// Panics if `secs` is out of range for `chrono`.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .unwrap_or_else(|| panic!("at: timestamp {secs} out of range"))
}

/// A temporary directory tree with helpers for setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use mirror_test_utils::{TestTree, at};
///
/// let tree = TestTree::new();
/// tree.file("index.html", "<h1>hi</h1>");
/// tree.file_at("css/site.css", "body{}", at(1_700_000_000));
/// tree.assert_file("index.html", "<h1>hi</h1>");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("TestTree::new: failed to create temp dir: {e}")),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Native path of the `/`-separated relative path `rel`.
    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root().to_path_buf(), |p, s| p.join(s))
    }

    /// Create a directory (and parents).
    ///
    /// # Panics
    /// Panics if the directory cannot be created.
    pub fn dir(&self, rel: &str) -> &Self {
        let path = self.path(rel);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("TestTree::dir: failed to create {}: {e}", path.display()));
        self
    }

    /// Write a file, creating parents.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn file(&self, rel: &str, content: impl AsRef<[u8]>) -> &Self {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("TestTree::file: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestTree::file: failed to write {}: {e}", path.display()));
        self
    }

    /// Write a file and set its modification time.
    pub fn file_at(&self, rel: &str, content: impl AsRef<[u8]>, modified: DateTime<Utc>) -> &Self {
        self.file(rel, content);
        self.set_modified(rel, modified)
    }

    /// Set the modification time of an existing file.
    ///
    /// # Panics
    /// Panics if the file cannot be opened or its time cannot be set.
    pub fn set_modified(&self, rel: &str, modified: DateTime<Utc>) -> &Self {
        let path = self.path(rel);
        let file = fs::File::options()
            .write(true)
            .open(&path)
            .unwrap_or_else(|e| panic!("TestTree::set_modified: failed to open {}: {e}", path.display()));
        file.set_modified(SystemTime::from(modified)).unwrap_or_else(|e| {
            panic!("TestTree::set_modified: failed on {}: {e}", path.display())
        });
        self
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, rel: &str) -> Vec<u8> {
        let path = self.path(rel);
        fs::read(&path)
            .unwrap_or_else(|e| panic!("TestTree::read: failed to read {}: {e}", path.display()))
    }

    /// # Panics
    /// Panics if the file is missing or its content differs.
    pub fn assert_file(&self, rel: &str, expected: impl AsRef<[u8]>) {
        let actual = self.read(rel);
        assert_eq!(
            actual,
            expected.as_ref(),
            "content of {rel} differs from expectation"
        );
    }
}
