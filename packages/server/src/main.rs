use std::sync::Arc;

use anyhow::Context;
use portal_server::config::AppConfig;
use portal_server::database::init_db;
use portal_server::identity::JwtIdentityProvider;
use portal_server::state::{AppState, build_media_store};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    let identity = JwtIdentityProvider::from_config(&config.identity)
        .context("Failed to initialize identity provider")?;

    let media = build_media_store(&config.storage)
        .await
        .context("Failed to initialize media store")?;
    info!(backend = media.backend(), "Media store ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config,
        identity: Arc::new(identity),
        media,
    };

    let app = portal_server::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server is running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
