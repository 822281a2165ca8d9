//! Tests for the tokio-backed LocalFs

use std::fs;

use mirror_fs::{EntryKind, Error, FileSystem, LocalFs};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[tokio::test]
async fn test_stat_reports_file_size_and_kind() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "0123456789").unwrap();

    let stat = LocalFs.stat(&dir.path().join("a.txt")).await.unwrap();

    assert_eq!(stat.kind, EntryKind::File);
    assert_eq!(stat.size, 10);
    assert!(stat.is_file());
}

#[tokio::test]
async fn test_stat_reports_directories() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("css")).unwrap();

    let stat = LocalFs.stat(&dir.path().join("css")).await.unwrap();

    assert!(stat.is_dir());
}

#[tokio::test]
async fn test_stat_missing_path_is_not_found() {
    let dir = tempdir().unwrap();

    let err = LocalFs.stat(&dir.path().join("nope")).await.unwrap_err();

    assert!(err.is_not_found(), "expected NotFound, got {err}");
}

#[tokio::test]
async fn test_read_dir_is_sorted() {
    let dir = tempdir().unwrap();
    for name in ["zeta.txt", "alpha.txt", "Mid.txt", ".hidden"] {
        fs::write(dir.path().join(name), "x").unwrap();
    }

    let names = LocalFs.read_dir(dir.path()).await.unwrap();

    assert_eq!(names, vec![".hidden", "Mid.txt", "alpha.txt", "zeta.txt"]);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_read_dir_omits_hidden_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "x").unwrap();
    fs::write(dir.path().join(OsStr::from_bytes(b".cache\xff")), "x").unwrap();

    let names = LocalFs.read_dir(dir.path()).await.unwrap();

    assert_eq!(names, vec!["a.txt"]);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_read_dir_rejects_visible_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.txt")), "x").unwrap();

    let err = LocalFs.read_dir(dir.path()).await.unwrap_err();

    assert!(matches!(err, Error::NonUtf8Name { .. }), "got {err}");
}

#[tokio::test]
async fn test_write_from_then_read_file() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("nested").join("out.bin");
    let mut reader: &[u8] = b"downloaded body";

    let written = LocalFs.write_from(&target, &mut reader).await.unwrap();

    assert_eq!(written, 15);
    assert_eq!(LocalFs.read_file(&target).await.unwrap(), b"downloaded body");
}

#[tokio::test]
async fn test_ensure_dir_is_idempotent() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("x").join("y");

    LocalFs.ensure_dir(&target).await.unwrap();
    LocalFs.ensure_dir(&target).await.unwrap();

    assert!(target.is_dir());
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinks_are_not_followed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.txt"), "x").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt")).unwrap();
    std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

    let file_link = LocalFs.stat(&dir.path().join("link.txt")).await.unwrap();
    let dir_link = LocalFs.stat(&dir.path().join("loop")).await.unwrap();

    assert_eq!(file_link.kind, EntryKind::Other);
    assert_eq!(dir_link.kind, EntryKind::Other);
}
