use std::sync::Arc;

use anyhow::Context;
use atelier_server::config::AppConfig;
use atelier_server::extractors::auth::JwtGuard;
use atelier_server::services::ImageService;
use atelier_server::state::AppState;
use atelier_server::use_cases::{SeaOrmImageStore, SeaOrmUserStore};
use atelier_server::{build_router, database};
use common::storage::build_storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier_server=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    let storage = build_storage(&config.storage)
        .await
        .context("Failed to initialize storage")?;
    info!(backend = ?config.storage.backend, "Storage ready");

    let images = ImageService::from_store(Arc::new(SeaOrmImageStore::new(db.clone())), storage);
    let guard = JwtGuard::jwt(config.auth.jwt_secret.clone());
    info!(strategy = guard.strategy_name(), "Auth guard configured");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        guard,
        images,
        users: Arc::new(SeaOrmUserStore::new(db)),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
