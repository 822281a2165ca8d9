//! Object key handling
//!
//! Object keys are relative paths joined with forward slashes regardless of
//! platform. They are converted to native paths only at I/O boundaries.

use std::path::{Component, Path, PathBuf};

use crate::{Error, KEY_SEPARATOR, Result};

/// Join a directory key and an entry name into a child key.
///
/// An empty `parent` denotes the root, so the result is just `name`.
pub fn join_key(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}{KEY_SEPARATOR}{name}")
    }
}

/// Resolve a key produced by a local scan against `root`.
///
/// No validation is done; use [`key_to_path`] for keys that come from a store.
pub fn resolve_key(root: &Path, key: &str) -> PathBuf {
    key.split(KEY_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Check that a key from an untrusted source maps to a path strictly inside
/// its root.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_key(key, "empty key"));
    }
    if key.starts_with(KEY_SEPARATOR) {
        return Err(Error::invalid_key(key, "absolute key"));
    }
    if key.contains('\\') {
        return Err(Error::invalid_key(key, "backslash in key"));
    }

    for segment in key.split(KEY_SEPARATOR) {
        match segment {
            "" => return Err(Error::invalid_key(key, "empty segment")),
            "." | ".." => return Err(Error::invalid_key(key, "relative segment")),
            _ => {}
        }
        // Catches drive prefixes and root components on Windows.
        let only_normal = Path::new(segment)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !only_normal {
            return Err(Error::invalid_key(key, "non-portable segment"));
        }
    }

    Ok(())
}

/// Validate `key` and resolve it against `root`.
pub fn key_to_path(root: &Path, key: &str) -> Result<PathBuf> {
    validate_key(key)?;
    Ok(resolve_key(root, key))
}

/// Convert a path below `root` back into a key.
///
/// Returns `None` if `path` is not inside `root` or is not valid UTF-8.
pub fn path_to_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?),
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn join_key_at_root() {
        assert_eq!(join_key("", "a.txt"), "a.txt");
    }

    #[test]
    fn join_key_nested() {
        assert_eq!(join_key("css/vendor", "reset.css"), "css/vendor/reset.css");
    }

    #[test]
    fn resolve_key_splits_segments() {
        let path = resolve_key(Path::new("/srv/site"), "css/site.css");
        assert_eq!(path, Path::new("/srv/site").join("css").join("site.css"));
    }

    #[test]
    fn path_to_key_roundtrip() {
        let root = Path::new("/srv/bucket");
        let path = resolve_key(root, "img/2024/logo.png");
        assert_eq!(path_to_key(root, &path).as_deref(), Some("img/2024/logo.png"));
    }

    #[test]
    fn path_to_key_outside_root() {
        assert_eq!(path_to_key(Path::new("/srv/a"), Path::new("/srv/b/x")), None);
    }

    #[test]
    fn path_to_key_of_root_itself() {
        assert_eq!(path_to_key(Path::new("/srv/a"), Path::new("/srv/a")), None);
    }
}
