//! Page data endpoints
//!
//! - GET /api/books
//! - GET /api/projects
//! - GET /api/scene

use axum::{Router, extract::State, response::Json, routing::get};

use crate::AppState;
use crate::error::AppError;
use crate::pages::{BooksPage, ProjectsPage};
use crate::scene::Building;

/// Create page data router
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/api/books", get(books))
        .route("/api/projects", get(projects))
        .route("/api/scene", get(scene))
}

/// GET /api/books
///
/// Always 200; a failed refresh is reported in the `error` field.
async fn books(State(state): State<AppState>) -> Json<BooksPage> {
    Json(state.books.load().await)
}

/// GET /api/projects
async fn projects(State(state): State<AppState>) -> Json<ProjectsPage> {
    Json(state.projects.load().await)
}

/// GET /api/scene
///
/// Assembled building description. Model files themselves are served
/// under /models.
async fn scene(State(state): State<AppState>) -> Result<Json<Building>, AppError> {
    let building = state.scene.building().await?;
    Ok(Json(building.as_ref().clone()))
}
