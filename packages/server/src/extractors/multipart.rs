use axum::extract::{DefaultBodyLimit, FromRef, FromRequest, Multipart, Request};
use common::storage::{StorageError, UploadFile};

use crate::error::AppError;

/// Largest accepted upload, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub u64);

impl UploadLimit {
    /// Body limit layer for upload routes; leaves headroom for multipart framing.
    pub fn body_limit(self) -> DefaultBodyLimit {
        let framing = 64 * 1024;
        DefaultBodyLimit::max(
            usize::try_from(self.0)
                .unwrap_or(usize::MAX)
                .saturating_add(framing),
        )
    }
}

/// An image file read from the `file` field of a `multipart/form-data` body.
///
/// The content type comes from the part's own header, falling back to a
/// guess from the filename and finally `application/octet-stream`.
pub struct ImageUpload(pub UploadFile);

impl<S> FromRequest<S> for ImageUpload
where
    UploadLimit: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let UploadLimit(max_size) = UploadLimit::from_ref(state);
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {}", e.body_text())))?;

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            if field.name() != Some("file") {
                continue; // Ignore unknown fields.
            }

            let file_name = field.file_name().map(|s| s.to_string());
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .or_else(|| {
                    file_name
                        .as_deref()
                        .and_then(|name| mime_guess::from_path(name).first())
                        .map(|m| m.to_string())
                })
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let mut data = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
            {
                let total = (data.len() + chunk.len()) as u64;
                if total > max_size {
                    return Err(AppError::Storage(StorageError::SizeLimitExceeded {
                        actual: total,
                        limit: max_size,
                    }));
                }
                data.extend_from_slice(&chunk);
            }

            if data.is_empty() {
                return Err(AppError::Validation("File must not be empty".into()));
            }

            return Ok(ImageUpload(UploadFile {
                file_name,
                content_type,
                data,
            }));
        }

        Err(AppError::Validation("Missing 'file' field".into()))
    }
}
