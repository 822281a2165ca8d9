//! Error types for mirror-core

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Store error from mirror-store
    #[error(transparent)]
    Store(#[from] mirror_store::Error),

    /// A truncated listing page carried no usable continuation cursor
    #[error("Listing of bucket {bucket} is truncated but carries no continuation cursor")]
    MissingCursor { bucket: String },

    /// The store handed back a cursor that does not move the listing forward
    #[error("Listing of bucket {bucket} did not advance past marker {marker:?}")]
    StalledCursor { bucket: String, marker: String },

    /// Configuration rejected at load time
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// An action failed partway through applying a set of actions
    #[error(
        "Stopped at {path} after {} completed action(s): {source}",
        .applied.len()
    )]
    Interrupted {
        path: String,
        /// Paths whose action completed before the failure, in order
        applied: Vec<String>,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// The error that caused the failure, looking through [`Error::Interrupted`].
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Interrupted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the failure came from the local filesystem.
    pub fn is_filesystem(&self) -> bool {
        matches!(self.root_cause(), Self::Fs(_))
    }

    /// Whether the failure came from the object store or its listing.
    pub fn is_store(&self) -> bool {
        matches!(
            self.root_cause(),
            Self::Store(_) | Self::MissingCursor { .. } | Self::StalledCursor { .. }
        )
    }
}
