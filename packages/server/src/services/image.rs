use std::sync::Arc;

use common::storage::{StorageClient, UploadFile};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::auth::Principal;
use crate::models::image::{ImageResponse, NewImage};
use crate::use_cases::{CreateImage, DeleteImage, ImageStore, IndexImages, ShowImage, UpdateImage};

/// Sequences storage and persistence for the image lifecycle.
///
/// Every operation is a straight pipeline: each stage runs only if the one
/// before it succeeded, and the first error is returned as-is. Nothing is
/// rolled back; if persistence fails after a storage write, the stored object
/// stays where it is. Success of a mutating operation is logged with the
/// acting user's email.
#[derive(Clone)]
pub struct ImageService {
    create_use_case: Arc<dyn CreateImage>,
    show_use_case: Arc<dyn ShowImage>,
    index_use_case: Arc<dyn IndexImages>,
    delete_use_case: Arc<dyn DeleteImage>,
    update_use_case: Arc<dyn UpdateImage>,
    storage: Arc<dyn StorageClient>,
}

impl ImageService {
    pub fn new(
        create_use_case: Arc<dyn CreateImage>,
        show_use_case: Arc<dyn ShowImage>,
        index_use_case: Arc<dyn IndexImages>,
        delete_use_case: Arc<dyn DeleteImage>,
        update_use_case: Arc<dyn UpdateImage>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        Self {
            create_use_case,
            show_use_case,
            index_use_case,
            delete_use_case,
            update_use_case,
            storage,
        }
    }

    /// Wire all five use cases to a single store.
    pub fn from_store<S>(store: Arc<S>, storage: Arc<dyn StorageClient>) -> Self
    where
        S: ImageStore + 'static,
    {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            storage,
        )
    }

    #[instrument(skip(self, file, principal), fields(user_id = principal.id))]
    pub async fn create(
        &self,
        file: &UploadFile,
        principal: &Principal,
    ) -> Result<ImageResponse, AppError> {
        let stored = self.storage.upload(file).await?;
        let image = NewImage::from_upload(stored, &file.content_type);
        let record = self.create_use_case.create(image).await?;
        info!(url = %record.url, email = %principal.email, "Image created");
        Ok(ImageResponse::from(record))
    }

    #[instrument(skip(self))]
    pub async fn show(&self, id: Uuid) -> Result<ImageResponse, AppError> {
        let record = self.show_use_case.show(id).await?;
        Ok(ImageResponse::from(record))
    }

    #[instrument(skip(self))]
    pub async fn index(&self) -> Result<Vec<ImageResponse>, AppError> {
        let records = self.index_use_case.index().await?;
        Ok(records.into_iter().map(ImageResponse::from).collect())
    }

    #[instrument(skip(self, principal), fields(user_id = principal.id))]
    pub async fn delete(&self, id: Uuid, principal: &Principal) -> Result<(), AppError> {
        let record = self.show_use_case.show(id).await?;
        self.storage.delete(&record.stored_object()).await?;
        self.delete_use_case.delete(id).await?;
        info!(url = %record.url, email = %principal.email, "Image deleted");
        Ok(())
    }

    #[instrument(skip(self, file, principal), fields(user_id = principal.id))]
    pub async fn update(
        &self,
        id: Uuid,
        file: &UploadFile,
        principal: &Principal,
    ) -> Result<ImageResponse, AppError> {
        let existing = self.show_use_case.show(id).await?;
        let stored = self.storage.update(&existing.stored_object(), file).await?;
        let image = NewImage::from_upload(stored, &file.content_type);
        let record = self.update_use_case.update(id, image).await?;
        info!(url = %record.url, email = %principal.email, "Image updated");
        Ok(ImageResponse::from(record))
    }
}
