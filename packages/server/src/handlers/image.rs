use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Principal;
use crate::extractors::multipart::ImageUpload;
use crate::models::image::{ImageListResponse, ImageResponse};
use crate::state::AppState;

fn parse_image_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("Invalid image ID".into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/images",
    tag = "Images",
    operation_id = "createImage",
    summary = "Upload an image",
    description = "Stores the `file` multipart field with the storage provider and records it. \
        The media type is taken from the part's MIME subtype; unrecognised subtypes are \
        recorded as `unknown`.",
    request_body(content_type = "multipart/form-data", description = "Image upload"),
    responses(
        (status = 201, description = "Image created", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 502, description = "Storage provider failure (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, principal, upload), fields(user_id = principal.id))]
pub async fn create_image(
    principal: Principal,
    State(state): State<AppState>,
    ImageUpload(upload): ImageUpload,
) -> Result<impl IntoResponse, AppError> {
    let image = state.images.create(&upload, &principal).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/api/v1/images",
    tag = "Images",
    operation_id = "listImages",
    summary = "List images",
    responses(
        (status = 200, description = "All images, oldest first", body = ImageListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn list_images(State(state): State<AppState>) -> Result<Json<ImageListResponse>, AppError> {
    let images = state.images.index().await?;
    Ok(Json(ImageListResponse::from(images)))
}

#[utoipa::path(
    get,
    path = "/api/v1/images/{id}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Get an image",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 200, description = "The image", body = ImageResponse),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImageResponse>, AppError> {
    let id = parse_image_id(&id)?;
    Ok(Json(state.images.show(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/images/{id}",
    tag = "Images",
    operation_id = "updateImage",
    summary = "Replace an image",
    description = "Replaces the stored file of an existing image with the `file` multipart field.",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    request_body(content_type = "multipart/form-data", description = "Replacement image"),
    responses(
        (status = 200, description = "Image replaced", body = ImageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 502, description = "Storage provider failure (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, principal, upload), fields(user_id = principal.id))]
pub async fn update_image(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ImageUpload(upload): ImageUpload,
) -> Result<Json<ImageResponse>, AppError> {
    let id = parse_image_id(&id)?;
    Ok(Json(state.images.update(id, &upload, &principal).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/images/{id}",
    tag = "Images",
    operation_id = "deleteImage",
    summary = "Delete an image",
    description = "Removes the file from the storage provider, then the record.",
    params(("id" = String, Path, description = "Image ID (UUID)")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 400, description = "Malformed ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID, UNAUTHORIZED)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Storage provider failure (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, principal), fields(user_id = principal.id))]
pub async fn delete_image(
    principal: Principal,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_image_id(&id)?;
    state.images.delete(id, &principal).await?;
    Ok(StatusCode::NO_CONTENT)
}
