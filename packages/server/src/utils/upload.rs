use std::path::Path;

use axum::extract::multipart::Field;
use common::storage::{MediaKey, MediaKind, MediaStore};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;

const MAX_FILENAME_LEN: usize = 255;

/// A multipart file field spooled to a local temporary file.
///
/// The temporary file is removed when this value is dropped.
pub struct TempUpload {
    path: TempPath,
    filename: String,
    size: u64,
}

impl TempUpload {
    /// Stream a file field into `temp_dir`, rejecting it once it grows past
    /// `max_size` bytes.
    pub async fn from_field(
        mut field: Field<'_>,
        temp_dir: &Path,
        max_size: u64,
    ) -> Result<Self, AppError> {
        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
        let filename = validate_upload_filename(&filename)?.to_string();

        let (std_file, path) = tempfile::Builder::new()
            .prefix("portal-upload-")
            .tempfile_in(temp_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?
            .into_parts();
        let mut file = tokio::fs::File::from_std(std_file);

        let mut size: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            size += chunk.len() as u64;
            if size > max_size {
                return Err(AppError::Validation(format!(
                    "File exceeds maximum size of {max_size} bytes"
                )));
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to write temp file: {e}")))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to flush temp file: {e}")))?;

        Ok(Self {
            path,
            filename,
            size,
        })
    }

    /// Hand the file to the media store and return its public URL.
    /// The local copy is removed afterwards in every case.
    pub async fn store(self, media: &dyn MediaStore, kind: MediaKind) -> Result<String, AppError> {
        let key = MediaKey::generate(kind, &self.filename);
        let url = media.put_file(&key, &self.path).await?;
        tracing::debug!(
            key = %key,
            size = self.size,
            backend = media.backend(),
            "Stored upload"
        );
        Ok(url)
    }
}

/// Validate a client-supplied filename. Only its extension reaches the storage key.
fn validate_upload_filename(raw: &str) -> Result<&str, AppError> {
    let name = raw.trim();
    let problem = if name.is_empty() {
        Some("filename is empty")
    } else if name.len() > MAX_FILENAME_LEN {
        Some("filename is too long")
    } else if name.chars().any(|c| c.is_control()) {
        Some("filename contains control characters")
    } else if name.contains('/') || name.contains('\\') {
        Some("filename must not contain path separators")
    } else if name == "." || name == ".." {
        Some("filename must not be a relative path component")
    } else {
        None
    };

    match problem {
        Some(msg) => Err(AppError::Validation(format!("Invalid filename: {msg}"))),
        None => Ok(name),
    }
}

#[cfg(test)]
impl TempUpload {
    pub(crate) async fn from_bytes(temp_dir: &Path, filename: &str, data: &[u8]) -> Self {
        let (std_file, path) = tempfile::Builder::new()
            .prefix("portal-upload-")
            .tempfile_in(temp_dir)
            .unwrap()
            .into_parts();
        let mut file = tokio::fs::File::from_std(std_file);
        file.write_all(data).await.unwrap();
        file.flush().await.unwrap();
        Self {
            path,
            filename: filename.to_string(),
            size: data.len() as u64,
        }
    }
}
