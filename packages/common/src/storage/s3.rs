use std::path::Path;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use serde::Deserialize;

use super::error::StorageError;
use super::key::MediaKey;
use super::traits::{MediaStore, public_url};

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct S3Settings {
    pub bucket: String,
    /// Region name, e.g. `us-east-1` or `auto` for R2.
    pub region: String,
    /// Custom endpoint for S3-compatible stores. Empty means AWS.
    #[serde(default)]
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Base URL objects are publicly reachable under, e.g. a CDN origin.
    pub public_base_url: String,
    /// Use path-style addressing (`endpoint/bucket/key`).
    #[serde(default)]
    pub path_style: bool,
}

/// Media store backed by an S3-compatible object store.
pub struct S3MediaStore {
    bucket: Box<Bucket>,
    public_base_url: String,
    max_size: u64,
}

impl S3MediaStore {
    pub fn new(settings: &S3Settings, max_size: u64) -> Result<Self, StorageError> {
        for (field, value) in [
            ("bucket", &settings.bucket),
            ("region", &settings.region),
            ("access_key", &settings.access_key),
            ("secret_key", &settings.secret_key),
            ("public_base_url", &settings.public_base_url),
        ] {
            if value.trim().is_empty() {
                return Err(StorageError::Config(format!("storage.s3.{field} is required")));
            }
        }

        let region = if settings.endpoint.is_empty() {
            settings
                .region
                .parse::<Region>()
                .map_err(|e| StorageError::Config(format!("invalid region: {e}")))?
        } else {
            Region::Custom {
                region: settings.region.clone(),
                endpoint: settings.endpoint.clone(),
            }
        };

        let credentials = Credentials::new(
            Some(&settings.access_key),
            Some(&settings.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Config(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&settings.bucket, region, credentials)
            .map_err(|e| StorageError::Config(format!("invalid bucket: {e}")))?;
        if settings.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_base_url: settings.public_base_url.clone(),
            max_size,
        })
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn put_file(&self, key: &MediaKey, source: &Path) -> Result<String, StorageError> {
        let size = tokio::fs::metadata(source).await?.len();
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }
        let data = tokio::fs::read(source).await?;

        let response = self
            .bucket
            .put_object_with_content_type(key.as_str(), &data, &key.content_type())
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Backend(format!(
                "put_object for {key} returned status {status}"
            )));
        }

        tracing::debug!(key = %key, size, "Stored media in bucket");
        Ok(public_url(&self.public_base_url, key))
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
