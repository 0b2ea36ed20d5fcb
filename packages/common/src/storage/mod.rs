mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

use std::sync::Arc;

pub use error::StorageError;
pub use key::{new_object_id, object_url, validate_object_id};
pub use traits::{StorageClient, StoredObject, UploadFile};

use crate::config::{StorageBackend, StorageConfig};

/// Build the storage client selected by `config.backend`.
pub async fn build_storage(config: &StorageConfig) -> Result<Arc<dyn StorageClient>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store = filesystem::FilesystemStorage::new(
                config.filesystem.root.clone(),
                config.public_url.clone(),
                config.max_object_size,
            )
            .await?;
            tracing::info!(root = %config.filesystem.root.display(), "Using filesystem storage");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => {
            let s3_config = config.s3.as_ref().ok_or_else(|| {
                StorageError::Backend("storage.backend is 's3' but [storage.s3] is missing".into())
            })?;
            let store = s3::S3Storage::new(s3_config, config.public_url.clone(), config.max_object_size)?;
            tracing::info!(bucket = %s3_config.bucket, "Using S3 storage");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Backend(
            "S3 storage requires the 'object-storage' feature".into(),
        )),
    }
}
