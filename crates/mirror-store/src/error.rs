//! Error types for mirror-store

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] mirror_fs::Error),

    #[error("Bucket not found: {bucket}")]
    NoSuchBucket { bucket: String },

    #[error("Object not found: {bucket}/{key}")]
    NoSuchKey { bucket: String, key: String },

    #[error("Size mismatch for {key}: declared {declared} bytes, body has {actual}")]
    SizeMismatch {
        key: String,
        declared: u64,
        actual: u64,
    },

    #[error("Store backend error: {message}")]
    Backend { message: String },

    #[error("Listing task failed: {message}")]
    ListingTask { message: String },
}
