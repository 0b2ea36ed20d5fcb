use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// A file received from a client, ready to be handed to a storage backend.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename as sent by the client, if any.
    pub file_name: Option<String>,
    /// Declared MIME type, e.g. `image/png`.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: None,
            content_type: content_type.into(),
            data,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Handle to an object held by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Backend-issued object id (the key inside the bucket or root directory).
    pub id: String,
    /// Public retrieval URL.
    pub url: String,
}

/// Blob storage for uploaded files.
///
/// Implementations issue their own object ids and URLs. Callers never build
/// a [`StoredObject`] by hand except from values a backend returned earlier.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Store a new object and return its id and URL.
    async fn upload(&self, file: &UploadFile) -> Result<StoredObject, StorageError>;

    /// Replace `existing` with `file`.
    ///
    /// The new object is written before the old one is removed, so a failed
    /// upload leaves `existing` in place.
    async fn update(
        &self,
        existing: &StoredObject,
        file: &UploadFile,
    ) -> Result<StoredObject, StorageError> {
        let replacement = self.upload(file).await?;
        self.delete(existing).await?;
        Ok(replacement)
    }

    /// Remove an object.
    async fn delete(&self, object: &StoredObject) -> Result<(), StorageError>;
}
