//! Post store error types.

/// Errors from post store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database file could not be opened or its namespace created.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A write transaction failed to commit.
    #[error("storage write failed: {0}")]
    StorageWrite(String),

    /// A read transaction could not be started or the collection opened.
    #[error("storage read failed: {0}")]
    StorageRead(String),

    /// No post is stored under this slug.
    #[error("post not found: {0}")]
    NotFound(String),

    /// The stored bytes are not a valid post.
    #[error("could not decode post {slug}: {source}")]
    Decoding {
        slug: String,
        #[source]
        source: serde_json::Error,
    },

    /// The post could not be serialized.
    #[error("could not encode post: {0}")]
    Encoding(#[source] serde_json::Error),
}

impl StoreError {
    pub(crate) fn unavailable(err: impl std::fmt::Display) -> Self {
        StoreError::StorageUnavailable(err.to_string())
    }

    pub(crate) fn write(err: impl std::fmt::Display) -> Self {
        StoreError::StorageWrite(err.to_string())
    }

    pub(crate) fn read(err: impl std::fmt::Display) -> Self {
        StoreError::StorageRead(err.to_string())
    }

    /// Whether this is the expected "no such post" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Result type for post store operations.
pub type StoreResult<T> = Result<T, StoreError>;
