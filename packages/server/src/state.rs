use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AppConfig;
use crate::extractors::auth::JwtGuard;
use crate::extractors::multipart::UploadLimit;
use crate::services::ImageService;
use crate::use_cases::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub guard: JwtGuard,
    pub images: ImageService,
    pub users: Arc<dyn UserStore>,
}

impl FromRef<AppState> for JwtGuard {
    fn from_ref(state: &AppState) -> Self {
        state.guard.clone()
    }
}

impl FromRef<AppState> for UploadLimit {
    fn from_ref(state: &AppState) -> Self {
        UploadLimit(state.config.storage.max_object_size)
    }
}
