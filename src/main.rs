//! Portfolio binary entry point

use portfolio::{AppState, config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application entry point
///
/// # Setup
/// 1. Load configuration from file and environment
/// 2. Initialize tracing/logging from the `logging` section
/// 3. Initialize AppState
/// 4. Build Axum router
/// 5. Start HTTP server
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration
    let config = config::AppConfig::load()?;

    // 2. Initialize tracing/logging; RUST_LOG overrides logging.level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.default_filter().into());

    if config.logging.is_json() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!("Starting portfolio backend...");
    tracing::info!(
        static_dir = %config.cache.static_dir.display(),
        models_dir = %config.models.dir.display(),
        workspace_id = config.toggl.workspace_id,
        "Configuration loaded"
    );

    // 3. Initialize metrics
    portfolio::metrics::init_metrics();

    // 4. Initialize application state
    let state = AppState::new(config.clone())?;

    // Assemble the building up front so model problems show at startup.
    if let Err(error) = state.scene.building().await {
        tracing::warn!(%error, "Building scene unavailable");
    }

    // 5. Build Axum router
    let app = portfolio::build_router(state);

    // 6. Start HTTP server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
