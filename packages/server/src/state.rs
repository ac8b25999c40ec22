use std::sync::Arc;

use common::storage::filesystem::FilesystemMediaStore;
use common::storage::s3::S3MediaStore;
use common::storage::{MediaStore, StorageError};
use sea_orm::DatabaseConnection;

use crate::config::{AppConfig, StorageBackend, StorageConfig};
use crate::identity::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub identity: Arc<dyn IdentityProvider>,
    pub media: Arc<dyn MediaStore>,
}

/// Build the media store selected by `storage.backend`.
pub async fn build_media_store(config: &StorageConfig) -> Result<Arc<dyn MediaStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = FilesystemMediaStore::new(
                config.filesystem.base_path.clone(),
                config.filesystem.public_base_url.clone(),
                config.max_upload_size,
            )
            .await?;
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            let settings = config.s3.as_ref().ok_or_else(|| {
                StorageError::Config("storage.backend is s3 but [storage.s3] is missing".into())
            })?;
            let store = S3MediaStore::new(settings, config.max_upload_size)?;
            Ok(Arc::new(store))
        }
    }
}
