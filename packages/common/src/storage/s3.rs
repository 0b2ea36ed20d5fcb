use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::key::{new_object_id, object_url, validate_object_id};
use super::traits::{StorageClient, StoredObject, UploadFile};
use crate::config::S3StorageConfig;

/// S3-compatible object store (AWS, MinIO, R2, ...).
pub struct S3Storage {
    bucket: Box<Bucket>,
    public_url: String,
    max_size: u64,
}

impl S3Storage {
    pub fn new(
        config: &S3StorageConfig,
        public_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse::<Region>()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_url: public_url.into(),
            max_size,
        })
    }
}

fn check_status(status: u16, action: &str, id: &str) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(id.to_string())),
        _ => Err(StorageError::Backend(format!(
            "{action} of '{id}' failed with status {status}"
        ))),
    }
}

#[async_trait]
impl StorageClient for S3Storage {
    async fn upload(&self, file: &UploadFile) -> Result<StoredObject, StorageError> {
        if file.len() > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: file.len(),
                limit: self.max_size,
            });
        }

        let id = new_object_id(&file.content_type);
        let response = self
            .bucket
            .put_object_with_content_type(format!("/{id}"), &file.data, &file.content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        check_status(response.status_code(), "upload", &id)?;

        tracing::debug!(object_id = %id, bucket = %self.bucket.name(), "Stored object in S3");

        Ok(StoredObject {
            url: object_url(&self.public_url, &id),
            id,
        })
    }

    async fn delete(&self, object: &StoredObject) -> Result<(), StorageError> {
        let id = validate_object_id(&object.id)?;
        let response = self
            .bucket
            .delete_object(format!("/{id}"))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        check_status(response.status_code(), "delete", id)
    }
}
