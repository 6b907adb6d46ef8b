use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use guesshub::{
    api,
    catalog::Catalog,
    config::ServerConfig,
    media::RawgImageResolver,
    state::AppState,
    sweeper,
    types::GameConfig,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guesshub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GuessHub...");

    let server_config = ServerConfig::from_env();
    let game_config = GameConfig::from_env();

    // The service is useless without a catalog
    let catalog = match Catalog::load(&server_config.dataset_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load catalog: {}", e);
            std::process::exit(1);
        }
    };
    if catalog.is_empty() {
        tracing::warn!("Catalog is empty, every session start will be rejected");
    }

    let mut state = AppState::new(catalog, game_config);
    match &server_config.rawg_api_key {
        Some(key) => {
            tracing::info!("RAWG image lookup enabled");
            state = state.with_resolver(Arc::new(RawgImageResolver::new(key.clone())));
        }
        None => tracing::info!("RAWG_API_KEY not set, using catalog images only"),
    }
    let state = Arc::new(state);

    // Spawn background task for evicting stale sessions (if configured)
    sweeper::spawn_session_sweeper(
        state.clone(),
        server_config.eviction_policy(),
        server_config.sweep_interval,
    );

    let app = api::router(state)
        .fallback_service(ServeDir::new(&server_config.static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(&server_config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", server_config.addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on http://{}", server_config.addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
