//! Config files driving a reconciler end to end

use mirror_core::{Error, MirrorConfig, StoreConfig};
use mirror_test_utils::TestTree;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_yaml_config_resolves_relative_to_its_directory() {
    let tree = TestTree::new();
    tree.file(
        "conf/mirror.yaml",
        "directory: ../site\nbucket: www\nACL: private\nstore:\n  type: directory\n  root: ../buckets\n  pageSize: 1\n",
    )
    .file("site/a.txt", "a")
    .file("site/b.txt", "b")
    .dir("buckets/www");

    let config = MirrorConfig::load(&tree.path("conf/mirror.yaml")).unwrap();
    assert_eq!(config.acl, "private");
    assert!(config.directory.ends_with("conf/../site"));

    let report = config.reconciler().sync().await.unwrap();
    assert_eq!(report.applied, vec!["a.txt", "b.txt"]);
    tree.assert_file("buckets/www/a.txt~obj", "a");
}

#[test]
fn test_toml_config_defaults() {
    let tree = TestTree::new();
    tree.file(
        "mirror.toml",
        "directory = \"site\"\nbucket = \"www\"\nregion = \"eu-west-1\"\n\n[store]\ntype = \"directory\"\nroot = \"/srv/buckets\"\n",
    );

    let config = MirrorConfig::load(&tree.path("mirror.toml")).unwrap();

    assert_eq!(config.acl, "public-read");
    assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    assert!(config.credentials.is_empty());
    assert_eq!(
        config.store,
        StoreConfig::Directory {
            root: "/srv/buckets".into(),
            page_size: None
        }
    );
}

#[test]
fn test_unknown_store_type_is_a_parse_error() {
    let tree = TestTree::new();
    tree.file(
        "mirror.json",
        r#"{"directory": "site", "bucket": "www", "store": {"type": "s3"}}"#,
    );

    let err = MirrorConfig::load(&tree.path("mirror.json")).unwrap_err();
    assert!(matches!(err, Error::Fs(mirror_fs::Error::ConfigParse { .. })));
}

#[test]
fn test_empty_acl_is_rejected() {
    let tree = TestTree::new();
    tree.file(
        "mirror.json",
        r#"{"directory": "site", "bucket": "www", "ACL": " ", "store": {"type": "directory", "root": "b"}}"#,
    );

    let err = MirrorConfig::load(&tree.path("mirror.json")).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig { .. }));
}
