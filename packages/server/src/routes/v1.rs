use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::extractors::auth::guard;
use crate::extractors::multipart::UploadLimit;
use crate::handlers;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/images", image_routes(state))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

/// Every image route sits behind the JWT guard.
fn image_routes(state: &AppState) -> Router<AppState> {
    let limit = UploadLimit(state.config.storage.max_object_size);

    Router::new()
        .route(
            "/",
            get(handlers::image::list_images).post(handlers::image::create_image),
        )
        .route(
            "/{id}",
            get(handlers::image::get_image)
                .put(handlers::image::update_image)
                .delete(handlers::image::delete_image),
        )
        .layer(limit.body_limit())
        .route_layer(middleware::from_fn_with_state(state.guard.clone(), guard))
}
