//! Mirror configuration
//!
//! Loaded once at startup through [`mirror_fs::ConfigStore`], so JSON, TOML
//! and YAML files are all accepted. Relative paths resolve against the
//! directory holding the config file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use mirror_fs::ConfigStore;
use mirror_store::{DirectoryStore, ObjectStore};
use serde::Deserialize;

use crate::reconcile::Reconciler;
use crate::{Error, Result};

/// Object ACL applied to uploads unless configured otherwise.
pub const DEFAULT_ACL: &str = "public-read";

fn default_acl() -> String {
    DEFAULT_ACL.to_string()
}

/// Store credentials. Never printed.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub secret_access_key: Option<String>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.access_key_id.is_none() && self.secret_access_key.is_none()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("access_key_id", &redact(&self.access_key_id))
            .field("secret_access_key", &redact(&self.secret_access_key))
            .finish()
    }
}

/// Transport dialect and its settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Buckets kept as directories under `root`
    Directory {
        root: PathBuf,
        #[serde(default, rename = "pageSize")]
        page_size: Option<usize>,
    },
}

/// Top-level configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// Local directory to mirror
    pub directory: PathBuf,
    pub bucket: String,
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(rename = "ACL", default = "default_acl")]
    pub acl: String,
    pub store: StoreConfig,
}

impl MirrorConfig {
    /// Load, resolve and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config: Self = ConfigStore::new().load(path)?;
        let base = config_dir(path)?;
        config.resolve_paths(&base);
        config.validate()?;
        Ok(config)
    }

    /// Make relative paths absolute against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        self.directory = base.join(&self.directory);
        match &mut self.store {
            StoreConfig::Directory { root, .. } => *root = base.join(&*root),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket.trim().is_empty() {
            return Err(Error::invalid_config("bucket must not be empty"));
        }
        if self.bucket.contains(['/', '\\']) || self.bucket == "." || self.bucket == ".." {
            return Err(Error::invalid_config(format!(
                "bucket {:?} is not a valid bucket name",
                self.bucket
            )));
        }
        if self.acl.trim().is_empty() {
            return Err(Error::invalid_config("ACL must not be empty"));
        }
        match &self.store {
            StoreConfig::Directory {
                page_size: Some(0), ..
            } => Err(Error::invalid_config("pageSize must be at least 1")),
            StoreConfig::Directory { .. } => Ok(()),
        }
    }

    /// Build the store described by this config.
    pub fn open_store(&self) -> Arc<dyn ObjectStore> {
        match &self.store {
            StoreConfig::Directory { root, page_size } => {
                let mut store = DirectoryStore::new(root, &self.bucket);
                if let Some(page_size) = page_size {
                    store = store.with_page_size(*page_size);
                }
                Arc::new(store)
            }
        }
    }

    /// Reconciler for this config, without an observer.
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(&self.directory, self.open_store()).with_acl(&self.acl)
    }
}

fn config_dir(path: &Path) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    dunce::canonicalize(parent).map_err(|e| Error::Fs(mirror_fs::Error::io(parent, e)))
}
