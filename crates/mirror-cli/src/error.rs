//! Error types for mirror-cli

use std::path::PathBuf;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The config file could not be loaded or failed validation
    #[error("Cannot load config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: mirror_core::Error,
    },

    /// Error from mirror-core
    #[error(transparent)]
    Core(#[from] mirror_core::Error),

    /// JSON output error
    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config(path: impl Into<PathBuf>, source: mirror_core::Error) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }
}
