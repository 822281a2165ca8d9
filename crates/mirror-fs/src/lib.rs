//! Filesystem collaborator for bucket-mirror
//!
//! Provides the async filesystem interface the reconciliation engine scans
//! and writes through, object key <-> path mapping, atomic writes,
//! content-type detection and format-agnostic config loading.

pub mod config;
pub mod constants;
pub mod content_type;
pub mod error;
pub mod fs;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::{DEFAULT_CONTENT_TYPE, HIDDEN_MARKER, KEY_SEPARATOR};
pub use content_type::guess_content_type;
pub use error::{Error, Result};
pub use fs::{EntryKind, FileStat, FileSystem, LocalFs};
pub use path::{join_key, key_to_path, resolve_key, validate_key};
