use chrono::{DateTime, Utc};
use common::storage::StoredObject;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::image;

/// Supported image formats, derived from the MIME subtype of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
    Bmp,
    Tiff,
    Avif,
    /// Any subtype not listed above. Uploads are still accepted.
    Unknown,
}

impl MediaType {
    /// Map a MIME type such as `image/png` or `image/svg+xml; charset=utf-8`.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.split_once('/') {
            Some((_, subtype)) => Self::from_subtype(subtype),
            None => MediaType::Unknown,
        }
    }

    fn from_subtype(subtype: &str) -> Self {
        match subtype.trim().to_ascii_lowercase().as_str() {
            "png" => MediaType::Png,
            "jpeg" | "jpg" | "pjpeg" => MediaType::Jpeg,
            "gif" => MediaType::Gif,
            "webp" => MediaType::Webp,
            "svg+xml" | "svg" => MediaType::Svg,
            "bmp" => MediaType::Bmp,
            "tiff" => MediaType::Tiff,
            "avif" => MediaType::Avif,
            _ => MediaType::Unknown,
        }
    }

    /// Inverse of [`MediaType::as_str`]; unrecognised names become `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "png" => MediaType::Png,
            "jpeg" => MediaType::Jpeg,
            "gif" => MediaType::Gif,
            "webp" => MediaType::Webp,
            "svg" => MediaType::Svg,
            "bmp" => MediaType::Bmp,
            "tiff" => MediaType::Tiff,
            "avif" => MediaType::Avif,
            _ => MediaType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Png => "png",
            MediaType::Jpeg => "jpeg",
            MediaType::Gif => "gif",
            MediaType::Webp => "webp",
            MediaType::Svg => "svg",
            MediaType::Bmp => "bmp",
            MediaType::Tiff => "tiff",
            MediaType::Avif => "avif",
            MediaType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image that has been stored but not yet persisted.
///
/// The only constructor takes the [`StoredObject`] a storage backend returned,
/// so a record cannot exist without a completed upload behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    storage_id: String,
    media_type: MediaType,
    url: String,
}

impl NewImage {
    pub fn from_upload(stored: StoredObject, content_type: &str) -> Self {
        Self {
            storage_id: stored.id,
            media_type: MediaType::from_mime(content_type),
            url: stored.url,
        }
    }

    pub fn storage_id(&self) -> &str {
        &self.storage_id
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A persisted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: Uuid,
    pub storage_id: String,
    pub media_type: MediaType,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Build the persisted form of `image` under `id`.
    pub fn from_new(
        id: Uuid,
        image: NewImage,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            storage_id: image.storage_id,
            media_type: image.media_type,
            url: image.url,
            created_at,
            updated_at,
        }
    }

    /// The storage handle for this record's blob.
    pub fn stored_object(&self) -> StoredObject {
        StoredObject {
            id: self.storage_id.clone(),
            url: self.url.clone(),
        }
    }
}

impl From<image::Model> for ImageRecord {
    fn from(model: image::Model) -> Self {
        Self {
            id: model.id,
            storage_id: model.storage_id,
            media_type: MediaType::from_name(&model.media_type),
            url: model.url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Response DTO for a single image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImageResponse {
    /// Image ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: Uuid,
    /// Object id inside the storage backend.
    #[schema(example = "01936f0e-1111-7abc-8000-00000000abcd.png")]
    pub storage_id: String,
    pub media_type: MediaType,
    /// Public retrieval URL.
    #[schema(example = "https://cdn.example.com/01936f0e-1111-7abc-8000-00000000abcd.png")]
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ImageRecord> for ImageResponse {
    fn from(record: ImageRecord) -> Self {
        Self {
            id: record.id,
            storage_id: record.storage_id,
            media_type: record.media_type,
            url: record.url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Response DTO for listing images.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImageListResponse {
    pub images: Vec<ImageResponse>,
    pub total: u64,
}

impl From<Vec<ImageResponse>> for ImageListResponse {
    fn from(images: Vec<ImageResponse>) -> Self {
        Self {
            total: images.len() as u64,
            images,
        }
    }
}
