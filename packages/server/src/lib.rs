pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod use_cases;
pub mod utils;

use std::time::Duration;

use axum::Json;
use axum::http::{HeaderValue, Method};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::routing::get;
use common::StorageBackend;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atelier Image API",
        version = "1.0.0",
        description = "Image upload and management backed by object storage"
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        handlers::image::create_image,
        handlers::image::list_images,
        handlers::image::get_image,
        handlers::image::update_image,
        handlers::image::delete_image,
    ),
    components(schemas(
        error::ErrorBody,
        models::auth::RegisterRequest,
        models::auth::LoginRequest,
        models::auth::LoginResponse,
        models::auth::UserResponse,
        models::image::MediaType,
        models::image::ImageResponse,
        models::image::ImageListResponse,
    )),
    tags(
        (name = "Auth", description = "Registration and bearer tokens"),
        (name = "Images", description = "Image lifecycle: upload, read, replace, delete"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
///
/// Uploaded files are served under `/files` only for the filesystem backend;
/// S3 objects are addressed through the bucket's own public URL.
pub fn build_router(state: AppState) -> axum::Router {
    let config = state.config.clone();
    let api = ApiDoc::openapi();

    let mut router = axum::Router::new()
        .nest("/api", routes::api_routes(&state))
        .with_state(state)
        .route(
            "/api-docs/openapi.json",
            get({
                let api = api.clone();
                move || async move { Json(api) }
            }),
        )
        .merge(Scalar::with_url("/scalar", api));

    if config.storage.backend == StorageBackend::Filesystem {
        router = router.nest_service("/files", ServeDir::new(&config.storage.filesystem.root));
    }

    router
        .layer(cors_layer(&config.server.cors))
        .layer(TraceLayer::new_for_http())
}
