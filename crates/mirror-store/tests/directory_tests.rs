//! Tests for the directory-backed bucket

use std::fs;

use mirror_store::{DirectoryStore, Error, OBJECT_SUFFIX, ObjectStore, PutObject};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;
use tokio::io::AsyncReadExt;

async fn bucket() -> (TempDir, DirectoryStore) {
    let temp = TempDir::new().unwrap();
    let store = DirectoryStore::new(temp.path(), "www");
    store.create_bucket().await.unwrap();
    (temp, store)
}

fn put(key: &str, body: &[u8]) -> PutObject {
    PutObject {
        key: key.to_string(),
        body: body.to_vec(),
        size: body.len() as u64,
        content_type: "text/html".to_string(),
        acl: "public-read".to_string(),
    }
}

#[tokio::test]
async fn test_list_on_missing_bucket_fails() {
    let temp = TempDir::new().unwrap();
    let store = DirectoryStore::new(temp.path(), "absent");

    let err = store.list_objects(None).await.unwrap_err();

    assert!(matches!(err, Error::NoSuchBucket { ref bucket } if bucket == "absent"));
}

#[tokio::test]
async fn test_put_creates_nested_files() {
    let (_temp, store) = bucket().await;

    store.put_object(put("css/site.css", b"body{}")).await.unwrap();

    let on_disk = fs::read(store.bucket_dir().join("css").join("site.css~obj")).unwrap();
    assert_eq!(on_disk, b"body{}");
}

#[tokio::test]
async fn test_list_returns_sorted_keys_with_sizes() {
    let (_temp, store) = bucket().await;
    store.put_object(put("b.txt", b"bb")).await.unwrap();
    store.put_object(put("a/z.txt", b"z")).await.unwrap();
    store.put_object(put("a.txt", b"aaa")).await.unwrap();

    let page = store.list_objects(None).await.unwrap();

    let listed: Vec<(&str, u64)> = page
        .items
        .iter()
        .map(|o| (o.key.as_str(), o.size))
        .collect();
    assert_eq!(listed, vec![("a.txt", 3), ("a/z.txt", 1), ("b.txt", 2)]);
    assert!(!page.is_truncated);
}

#[tokio::test]
async fn test_list_paginates() {
    let (temp, _) = bucket().await;
    let store = DirectoryStore::new(temp.path(), "www").with_page_size(2);
    for key in ["1", "2", "3", "4", "5"] {
        store.put_object(put(key, b"x")).await.unwrap();
    }

    let mut marker: Option<String> = None;
    let mut seen = Vec::new();
    let mut requests = 0;
    loop {
        let page = store.list_objects(marker.as_deref()).await.unwrap();
        requests += 1;
        seen.extend(page.items.iter().map(|o| o.key.clone()));
        if !page.is_truncated {
            break;
        }
        marker = page.next_marker;
    }

    assert_eq!(seen, vec!["1", "2", "3", "4", "5"]);
    assert_eq!(requests, 3);
}

#[tokio::test]
async fn test_get_streams_body() {
    let (_temp, store) = bucket().await;
    store.put_object(put("index.html", b"<h1>hi</h1>")).await.unwrap();

    let mut body = Vec::new();
    store
        .get_object("index.html")
        .await
        .unwrap()
        .read_to_end(&mut body)
        .await
        .unwrap();

    assert_eq!(body, b"<h1>hi</h1>");
}

#[tokio::test]
async fn test_get_missing_key_is_no_such_key() {
    let (_temp, store) = bucket().await;

    let err = store.get_object("nope.html").await.err().unwrap();

    assert!(matches!(err, Error::NoSuchKey { .. }));
}

#[tokio::test]
async fn test_delete_prunes_empty_directories() {
    let (_temp, store) = bucket().await;
    store.put_object(put("a/b/c.txt", b"x")).await.unwrap();
    store.put_object(put("a/keep.txt", b"x")).await.unwrap();

    store.delete_object("a/b/c.txt").await.unwrap();

    assert!(!store.bucket_dir().join("a").join("b").exists());
    assert!(store.bucket_dir().join("a").join("keep.txt~obj").exists());
    assert!(store.bucket_dir().exists());
}

async fn read_key(store: &DirectoryStore, key: &str) -> Vec<u8> {
    let mut body = Vec::new();
    store
        .get_object(key)
        .await
        .unwrap()
        .read_to_end(&mut body)
        .await
        .unwrap();
    body
}

fn keys(page: &mirror_store::ListPage) -> Vec<&str> {
    page.items.iter().map(|o| o.key.as_str()).collect()
}

#[tokio::test]
async fn test_key_and_key_prefix_coexist() {
    let (_temp, store) = bucket().await;
    store.put_object(put("docs", b"file")).await.unwrap();
    store.put_object(put("docs/index.html", b"page")).await.unwrap();

    let page = store.list_objects(None).await.unwrap();
    assert_eq!(keys(&page), vec!["docs", "docs/index.html"]);
    assert_eq!(read_key(&store, "docs").await, b"file");
    assert_eq!(read_key(&store, "docs/index.html").await, b"page");

    store.delete_object("docs").await.unwrap();
    let page = store.list_objects(None).await.unwrap();
    assert_eq!(keys(&page), vec!["docs/index.html"]);

    store.put_object(put("docs", b"again")).await.unwrap();
    store.delete_object("docs/index.html").await.unwrap();
    let page = store.list_objects(None).await.unwrap();
    assert_eq!(keys(&page), vec!["docs"]);
    assert!(!store.bucket_dir().join("docs").exists());
    assert_eq!(read_key(&store, "docs").await, b"again");
}

#[tokio::test]
async fn test_files_without_object_suffix_are_not_listed() {
    let (_temp, store) = bucket().await;
    store.put_object(put("a.txt", b"a")).await.unwrap();
    fs::write(store.bucket_dir().join("stray.txt"), "x").unwrap();
    fs::write(store.bucket_dir().join(OBJECT_SUFFIX), "x").unwrap();

    let page = store.list_objects(None).await.unwrap();

    assert_eq!(keys(&page), vec!["a.txt"]);
}

#[tokio::test]
async fn test_object_suffix_is_allowed_on_the_last_segment() {
    let (_temp, store) = bucket().await;
    store.put_object(put("notes~obj", b"n")).await.unwrap();

    let page = store.list_objects(None).await.unwrap();

    assert_eq!(keys(&page), vec!["notes~obj"]);
    assert_eq!(read_key(&store, "notes~obj").await, b"n");
}

#[tokio::test]
async fn test_delete_missing_key_succeeds() {
    let (_temp, store) = bucket().await;
    store.delete_object("never/existed.txt").await.unwrap();
}

#[rstest]
#[case("../escape.txt")]
#[case("/abs.txt")]
#[case("a//b.txt")]
#[case("docs~obj/index.html")]
#[tokio::test]
async fn test_unsafe_keys_are_rejected(#[case] key: &str) {
    let (_temp, store) = bucket().await;

    let err = store.put_object(put(key, b"x")).await.unwrap_err();

    assert!(
        matches!(err, Error::Fs(mirror_fs::Error::InvalidKey { .. })),
        "got {err:?}"
    );
}
