use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::StorageError;
use super::key::{new_object_id, object_url, validate_object_id};
use super::traits::{StorageClient, StoredObject, UploadFile};

/// Filesystem-backed object store.
///
/// Objects live flat under `{root}/{object id}`. Writes go through
/// `{root}/.tmp` and are renamed into place, so readers never observe a
/// partially written object.
pub struct FilesystemStorage {
    root: PathBuf,
    public_url: String,
    max_size: u64,
}

impl FilesystemStorage {
    /// Create a new filesystem store, creating `root` if needed.
    pub async fn new(
        root: PathBuf,
        public_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            public_url: public_url.into(),
            max_size,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, id: &str) -> Result<PathBuf, StorageError> {
        Ok(self.root.join(validate_object_id(id)?))
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl StorageClient for FilesystemStorage {
    async fn upload(&self, file: &UploadFile) -> Result<StoredObject, StorageError> {
        if file.len() > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: file.len(),
                limit: self.max_size,
            });
        }

        let id = new_object_id(&file.content_type);
        let object_path = self.object_path(&id)?;
        let temp_path = self.temp_path();

        let written = async {
            let mut temp_file = fs::File::create(&temp_path).await?;
            temp_file.write_all(&file.data).await?;
            temp_file.flush().await?;
            drop(temp_file);
            fs::rename(&temp_path, &object_path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::debug!(object_id = %id, size = file.len(), "Stored object on filesystem");

        Ok(StoredObject {
            url: object_url(&self.public_url, &id),
            id,
        })
    }

    async fn delete(&self, object: &StoredObject) -> Result<(), StorageError> {
        let path = self.object_path(&object.id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(object.id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
