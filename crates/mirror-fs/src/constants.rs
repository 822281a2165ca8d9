//! Constants shared by scanners, stores and the CLI.

/// Entries whose name starts with this marker are never scanned or mirrored.
pub const HIDDEN_MARKER: char = '.';

/// Separator between segments of an object key.
pub const KEY_SEPARATOR: char = '/';

/// Content type used when detection from the file name fails.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
