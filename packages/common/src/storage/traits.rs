use std::path::Path;

use async_trait::async_trait;

use super::error::StorageError;
use super::key::MediaKey;

/// Durable storage for uploaded media (logos, résumés).
///
/// Implementations copy a local file to the backing store and return a URL
/// that clients can fetch the file from without further credentials.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store the file at `source` under `key` and return its public URL.
    ///
    /// `source` is owned by the caller and is not removed by the store.
    async fn put_file(&self, key: &MediaKey, source: &Path) -> Result<String, StorageError>;

    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;
}

/// Join a public base URL and an object key with exactly one slash.
pub(crate) fn public_url(base: &str, key: &MediaKey) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key.as_str())
}
