use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::image;
use crate::error::AppError;
use crate::models::image::{ImageRecord, NewImage};

#[async_trait]
pub trait CreateImage: Send + Sync {
    async fn create(&self, image: NewImage) -> Result<ImageRecord, AppError>;
}

#[async_trait]
pub trait ShowImage: Send + Sync {
    /// `AppError::NotFound` when no image has this id.
    async fn show(&self, id: Uuid) -> Result<ImageRecord, AppError>;
}

#[async_trait]
pub trait IndexImages: Send + Sync {
    async fn index(&self) -> Result<Vec<ImageRecord>, AppError>;
}

#[async_trait]
pub trait DeleteImage: Send + Sync {
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait UpdateImage: Send + Sync {
    /// Replace the stored fields of image `id` with `image`.
    async fn update(&self, id: Uuid, image: NewImage) -> Result<ImageRecord, AppError>;
}

/// Everything the image service needs from persistence.
pub trait ImageStore: CreateImage + ShowImage + IndexImages + DeleteImage + UpdateImage {}

impl<T> ImageStore for T where T: CreateImage + ShowImage + IndexImages + DeleteImage + UpdateImage {}

fn not_found() -> AppError {
    AppError::NotFound("Image not found".into())
}

/// Postgres-backed image persistence.
#[derive(Clone)]
pub struct SeaOrmImageStore {
    db: DatabaseConnection,
}

impl SeaOrmImageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CreateImage for SeaOrmImageStore {
    async fn create(&self, image: NewImage) -> Result<ImageRecord, AppError> {
        let now = Utc::now();
        let model = image::ActiveModel {
            id: Set(Uuid::now_v7()),
            storage_id: Set(image.storage_id().to_string()),
            media_type: Set(image.media_type().as_str().to_string()),
            url: Set(image.url().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(ImageRecord::from(model))
    }
}

#[async_trait]
impl ShowImage for SeaOrmImageStore {
    async fn show(&self, id: Uuid) -> Result<ImageRecord, AppError> {
        image::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(ImageRecord::from)
            .ok_or_else(not_found)
    }
}

#[async_trait]
impl IndexImages for SeaOrmImageStore {
    async fn index(&self) -> Result<Vec<ImageRecord>, AppError> {
        let models = image::Entity::find()
            .order_by_asc(image::Column::CreatedAt)
            .order_by_asc(image::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(ImageRecord::from).collect())
    }
}

#[async_trait]
impl DeleteImage for SeaOrmImageStore {
    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = image::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}

#[async_trait]
impl UpdateImage for SeaOrmImageStore {
    async fn update(&self, id: Uuid, image: NewImage) -> Result<ImageRecord, AppError> {
        let existing = image::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(not_found)?;

        let mut active: image::ActiveModel = existing.into();
        active.storage_id = Set(image.storage_id().to_string());
        active.media_type = Set(image.media_type().as_str().to_string());
        active.url = Set(image.url().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(ImageRecord::from(model))
    }
}
