//! Content-type detection from file names

use std::path::Path;

use crate::DEFAULT_CONTENT_TYPE;

/// Guess a MIME type from the extension of `path`.
///
/// Falls back to `application/octet-stream` when the extension is missing or
/// unknown.
pub fn guess_content_type(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}
