/// Errors that can occur while storing uploaded media.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The upload exceeds the configured size limit.
    #[error("upload exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// The remote store rejected or failed the request.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// The store could not be constructed from its settings.
    #[error("invalid storage configuration: {0}")]
    Config(String),
}
