//! Round trips across the whole stack
//!
//! Local tree -> directory-backed bucket -> fresh local tree, checking that
//! each side converges and that a second pass is a no-op.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mirror_core::{DiffReason, Reconciler};
use mirror_store::{DirectoryStore, MemoryStore, ObjectStore};
use mirror_test_utils::{TestTree, at};
use pretty_assertions::assert_eq;

fn fixture_site() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/site")
}

const FIXTURE_KEYS: [&str; 4] = [
    "blog/2024/first-post.html",
    "blog/2024/first-post.json",
    "css/site.css",
    "index.html",
];

async fn directory_bucket(root: &Path, page_size: usize) -> Arc<DirectoryStore> {
    let store = DirectoryStore::new(root, "www").with_page_size(page_size);
    store.create_bucket().await.unwrap();
    Arc::new(store)
}

#[tokio::test]
async fn test_fixture_site_round_trip() {
    let buckets = TestTree::new();
    let restored = TestTree::new();
    let store = directory_bucket(buckets.root(), 2).await;

    let report = Reconciler::new(fixture_site(), store.clone())
        .sync()
        .await
        .unwrap();
    assert_eq!(report.applied, FIXTURE_KEYS.to_vec());
    assert!(!buckets.exists("www/.draft.html~obj"));

    let report = Reconciler::new(restored.root(), store.clone())
        .download_dir()
        .await
        .unwrap();
    assert_eq!(report.applied, FIXTURE_KEYS.to_vec());

    for key in FIXTURE_KEYS {
        let original = std::fs::read(fixture_site().join(key)).unwrap();
        restored.assert_file(key, original);
    }

    let set = Reconciler::new(fixture_site(), store).diff().await.unwrap();
    assert!(set.is_empty(), "unexpected differences: {set:?}");
}

#[tokio::test]
async fn test_local_edits_converge() {
    let site = TestTree::new();
    let buckets = TestTree::new();
    site.file_at("index.html", "v1", at(1_000))
        .file_at("about.html", "about", at(1_000))
        .file_at("old.html", "old", at(1_000));
    let store = directory_bucket(buckets.root(), 1000).await;
    let reconciler = Reconciler::new(site.root(), store.clone());

    reconciler.sync().await.unwrap();

    // Bucket copies are stamped at upload time; move them back so the
    // same-size edit below reads as newer.
    for key in ["index.html", "about.html"] {
        buckets.set_modified(&format!("www/{key}~obj"), at(1_000));
    }
    site.file("index.html", "v2")
        .file("about.html", "about us")
        .file("contact.html", "mail");
    std::fs::remove_file(site.path("old.html")).unwrap();

    let set = reconciler.diff().await.unwrap();
    let reasons: Vec<_> = set.iter().map(|e| (e.path.as_str(), e.reason)).collect();
    assert_eq!(
        reasons,
        vec![
            ("about.html", DiffReason::Size),
            ("contact.html", DiffReason::New),
            ("index.html", DiffReason::Modified),
            ("old.html", DiffReason::Missing),
        ]
    );

    reconciler.sync().await.unwrap();
    assert!(reconciler.diff().await.unwrap().is_empty());
    buckets.assert_file("www/index.html~obj", "v2");
    buckets.assert_file("www/about.html~obj", "about us");
    assert!(!buckets.exists("www/old.html~obj"));
}

#[tokio::test]
async fn test_store_dialects_list_the_same_keys() {
    let buckets = TestTree::new();
    let directory: Arc<dyn ObjectStore> = directory_bucket(buckets.root(), 3).await;
    let memory: Arc<dyn ObjectStore> = Arc::new(
        MemoryStore::new("www")
            .with_page_size(3)
            .without_next_marker(),
    );

    for store in [directory, memory] {
        let report = Reconciler::new(fixture_site(), store.clone())
            .upload_dir()
            .await
            .unwrap();
        assert_eq!(report.len(), FIXTURE_KEYS.len());

        let remote = Reconciler::new(fixture_site(), store)
            .scan_remote()
            .await
            .unwrap();
        assert_eq!(remote.paths().collect::<Vec<_>>(), FIXTURE_KEYS.to_vec());
    }
}

#[tokio::test]
async fn test_download_replaces_existing_files() {
    let site = TestTree::new();
    let memory = Arc::new(MemoryStore::new("www"));
    memory.insert("index.html", "from bucket", at(0));
    site.file("index.html", "local edit that is longer");

    Reconciler::new(site.root(), memory)
        .download_dir()
        .await
        .unwrap();

    site.assert_file("index.html", "from bucket");
    let names: Vec<_> = std::fs::read_dir(site.root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("index.html")]);
}

async fn remote_keys(reconciler: &Reconciler) -> Vec<String> {
    let index = reconciler.scan_remote().await.unwrap();
    index.paths().map(str::to_string).collect()
}

#[tokio::test]
async fn test_file_and_directory_swap_places() {
    let site = TestTree::new();
    let buckets = TestTree::new();
    let store = directory_bucket(buckets.root(), 1000).await;
    let reconciler = Reconciler::new(site.root(), store.clone());

    site.file("docs", "plain file");
    reconciler.sync().await.unwrap();
    assert_eq!(remote_keys(&reconciler).await, vec!["docs"]);

    std::fs::remove_file(site.path("docs")).unwrap();
    site.file("docs/index.html", "page");
    reconciler.sync().await.unwrap();
    assert_eq!(remote_keys(&reconciler).await, vec!["docs/index.html"]);
    buckets.assert_file("www/docs/index.html~obj", "page");

    std::fs::remove_dir_all(site.path("docs")).unwrap();
    site.file("docs", "plain again");
    reconciler.sync().await.unwrap();
    assert_eq!(remote_keys(&reconciler).await, vec!["docs"]);
    buckets.assert_file("www/docs~obj", "plain again");
    assert!(!buckets.exists("www/docs"));
    assert!(reconciler.diff().await.unwrap().is_empty());
}
