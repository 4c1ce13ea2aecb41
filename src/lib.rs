//! Portfolio - data backend for a personal portfolio site
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - /api/books, /api/projects, /api/scene                    │
//! │  - /covers, /models static files                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Page Loaders                           │
//! │  - JSON snapshots with a 7 day lifetime                     │
//! │  - Cover image cache                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Upstream Clients                          │
//! │  - Literal (GraphQL)                                        │
//! │  - Toggl Track (REST)                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers
//! - `pages`: Page loaders and file snapshots
//! - `literal`: Reading-list client
//! - `toggl`: Time-tracking client
//! - `scene`: Building model assembly
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod literal;
pub mod metrics;
pub mod pages;
pub mod scene;
pub mod toggl;

use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Reading list page
    pub books: Arc<pages::BooksLoader>,

    /// Project list page
    pub projects: Arc<pages::ProjectsLoader>,

    /// Assembled building, computed on first use
    pub scene: Arc<scene::SceneCache>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Build the shared HTTP client
    /// 2. Create the upstream clients
    /// 3. Wire the page loaders to their snapshot files
    ///
    /// # Errors
    /// Returns error if the HTTP client or static directory cannot be set up
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("portfolio/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| error::AppError::Internal(e.into()))?;
        let http_client = Arc::new(http_client);

        std::fs::create_dir_all(config.cache.covers_dir())?;

        let literal = Arc::new(literal::LiteralService::new(
            &config.literal,
            http_client.clone(),
        ));
        let toggl = Arc::new(toggl::TogglService::new(&config.toggl, http_client.clone()));

        let ttl = config.cache.ttl();
        let books = pages::BooksLoader::new(
            literal,
            pages::CoverStore::new(config.cache.covers_dir(), http_client),
            pages::SnapshotStore::new(
                "books",
                config.cache.snapshot_path(pages::BOOKS_SNAPSHOT),
                ttl,
            ),
        );
        let projects = pages::ProjectsLoader::new(
            toggl,
            pages::SnapshotStore::new(
                "projects",
                config.cache.snapshot_path(pages::PROJECTS_SNAPSHOT),
                ttl,
            ),
        );
        let scene = scene::SceneCache::new(config.models.dir.clone());

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            books: Arc::new(books),
            projects: Arc::new(projects),
            scene: Arc::new(scene),
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use axum::http::Method;
    use tower_http::{
        compression::CompressionLayer,
        cors::{Any, CorsLayer},
        services::ServeDir,
        trace::TraceLayer,
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api::pages_router())
        .nest_service(
            pages::COVERS_ROUTE,
            ServeDir::new(state.config.cache.covers_dir()),
        )
        .nest_service("/models", ServeDir::new(&state.config.models.dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
        .merge(api::metrics_router())
}

async fn health_check() -> &'static str {
    "OK"
}
