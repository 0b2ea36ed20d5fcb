mod v1;

use axum::Router;

use crate::state::AppState;

pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new().nest("/v1", v1::routes(state))
}
