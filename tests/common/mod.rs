//! Common test utilities for E2E tests
//!
//! `StubUpstream` stands in for Literal, Toggl and the cover CDN on a
//! local port; `TestServer` runs the real router against it.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path as UrlPath, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use portfolio::{AppState, config};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const LITERAL_EMAIL: &str = "reader@example.com";
pub const LITERAL_PASSWORD: &str = "correct-horse";
pub const TOGGL_TOKEN: &str = "toggl-token";
pub const WORKSPACE_ID: u64 = 4242;

/// Observable state of the stub upstream
#[derive(Default)]
pub struct StubCalls {
    pub base_url: Mutex<String>,
    pub logins: AtomicUsize,
    pub graphql_queries: AtomicUsize,
    /// Reject this many authenticated GraphQL requests as UNAUTHENTICATED
    pub reject_remaining: AtomicUsize,
    pub cover_requests: AtomicUsize,
    pub toggl_requests: Mutex<Vec<(String, Option<String>)>>,
    pub toggl_down: AtomicBool,
}

pub struct StubUpstream {
    pub base_url: String,
    pub calls: Arc<StubCalls>,
}

impl StubUpstream {
    pub async fn start() -> Self {
        let calls = Arc::new(StubCalls::default());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        *calls.base_url.lock().unwrap() = base_url.clone();

        let app = Router::new()
            .route("/graphql", post(graphql))
            .route("/toggl/workspaces/:workspace/projects", get(toggl_projects))
            .route("/toggl/workspaces/:workspace/clients", get(toggl_clients))
            .route("/images/:name", get(image))
            .with_state(calls.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, calls }
    }

    pub fn literal_url(&self) -> String {
        format!("{}/graphql", self.base_url)
    }

    pub fn toggl_url(&self) -> String {
        format!("{}/toggl", self.base_url)
    }

    pub fn literal_config(&self) -> config::LiteralConfig {
        config::LiteralConfig {
            api_url: self.literal_url(),
            email: LITERAL_EMAIL.to_string(),
            password: LITERAL_PASSWORD.to_string(),
        }
    }

    pub fn toggl_config(&self) -> config::TogglConfig {
        config::TogglConfig {
            api_url: self.toggl_url(),
            api_token: TOGGL_TOKEN.to_string(),
            workspace_id: WORKSPACE_ID,
        }
    }
}

async fn graphql(
    State(calls): State<Arc<StubCalls>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default();

    if query.contains("mutation login") {
        let n = calls.logins.fetch_add(1, Ordering::SeqCst) + 1;
        let variables = &body["variables"];
        if variables["email"] == LITERAL_EMAIL && variables["password"] == LITERAL_PASSWORD {
            return Json(json!({ "data": { "login": { "token": format!("token-{n}") } } }));
        }
        return Json(json!({
            "data": null,
            "errors": [{ "message": "Invalid email or password" }]
        }));
    }

    calls.graphql_queries.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Bearer token-"));
    let rejected = calls
        .reject_remaining
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();

    if !authorized || rejected {
        return Json(json!({
            "data": null,
            "errors": [{ "message": "Not authenticated", "extensions": { "code": "UNAUTHENTICATED" } }]
        }));
    }

    let base = calls.base_url.lock().unwrap().clone();
    Json(json!({ "data": { "myReadingStates": reading_states(&base) } }))
}

fn reading_state(id: &str, status: &str, created_at: &str, cover: Option<String>) -> Value {
    json!({
        "id": format!("rs-{id}"),
        "status": status,
        "bookId": id,
        "profileId": "profile-1",
        "createdAt": created_at,
        "__typename": "ReadingState",
        "book": {
            "id": id,
            "slug": format!("slug-{id}"),
            "title": format!("Title {id}"),
            "subtitle": null,
            "description": "A book",
            "isbn10": null,
            "isbn13": "9780000000000",
            "language": "en",
            "pageCount": 320,
            "publishedDate": "2020-01-01",
            "publisher": "Press",
            "physicalFormat": "PAPERBACK",
            "cover": cover,
            "authors": [{ "id": "author-1", "name": "Ann Author", "slug": "ann-author", "__typename": "Author" }],
            "gradientColors": ["#112233"],
            "workId": null,
            "__typename": "Book"
        }
    })
}

/// Shelf served by the stub; ids encode the expected outcome
pub fn reading_states(base: &str) -> Value {
    json!([
        reading_state("finished-old", "FINISHED", "2023-01-10T12:00:00.000Z", Some(format!("{base}/images/finished-old.jpg"))),
        reading_state("reading-now", "IS_READING", "2024-04-02T12:00:00.000Z", Some(format!("{base}/images/reading-now.jpg"))),
        reading_state("wishlist", "WANT_TO_READ", "2024-05-01T12:00:00.000Z", Some(format!("{base}/images/wishlist.jpg"))),
        reading_state("no-cover", "FINISHED", "2023-06-01T12:00:00.000Z", None),
        reading_state("broken-cover", "FINISHED", "2022-03-03T12:00:00.000Z", Some(format!("{base}/images/missing.jpg"))),
        reading_state("dropped", "DROPPED", "2024-01-01T12:00:00.000Z", None),
    ])
}

fn record_toggl(calls: &StubCalls, path: String, headers: &HeaderMap) -> Option<Response> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    calls.toggl_requests.lock().unwrap().push((path, auth.clone()));

    if calls.toggl_down.load(Ordering::SeqCst) {
        return Some((StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response());
    }
    if auth.as_deref() != Some(portfolio::toggl::basic_auth_header(TOGGL_TOKEN).as_str()) {
        return Some((StatusCode::FORBIDDEN, "Incorrect username and/or password").into_response());
    }
    None
}

async fn toggl_projects(
    State(calls): State<Arc<StubCalls>>,
    UrlPath(workspace): UrlPath<u64>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = record_toggl(&calls, format!("/workspaces/{workspace}/projects"), &headers) {
        return rejection;
    }

    Json(json!([
        toggl_project(1, workspace, Some(10), "Website"),
        toggl_project(2, workspace, None, "Side project"),
        toggl_project(3, workspace, Some(11), "Consulting"),
    ]))
    .into_response()
}

async fn toggl_clients(
    State(calls): State<Arc<StubCalls>>,
    UrlPath(workspace): UrlPath<u64>,
    headers: HeaderMap,
) -> Response {
    if let Some(rejection) = record_toggl(&calls, format!("/workspaces/{workspace}/clients"), &headers) {
        return rejection;
    }

    Json(json!([
        { "id": 10, "wid": workspace, "name": "Acme", "notes": null, "at": "2024-01-01T00:00:00Z",
          "creator_id": 5, "archived": false, "external_reference": null, "integration_ext_id": null,
          "integration_ext_type": null, "integration_provider": null, "permissions": null, "total_count": 2 },
        { "id": 11, "wid": workspace, "name": "Globex", "notes": "big", "at": "2024-01-01T00:00:00Z",
          "creator_id": 5, "archived": true, "external_reference": null, "integration_ext_id": null,
          "integration_ext_type": null, "integration_provider": null, "permissions": null, "total_count": 2 }
    ]))
    .into_response()
}

fn toggl_project(id: u64, workspace: u64, client_id: Option<u64>, name: &str) -> Value {
    json!({
        "id": id,
        "workspace_id": workspace,
        "client_id": client_id,
        "name": name,
        "is_private": false,
        "active": true,
        "at": "2024-05-01T10:00:00+00:00",
        "created_at": "2024-01-01T10:00:00+00:00",
        "server_deleted_at": null,
        "color": "#c9806b",
        "billable": true,
        "template": false,
        "auto_estimates": null,
        "estimated_hours": null,
        "rate": 95.0,
        "rate_last_updated": null,
        "currency": "EUR",
        "recurring": false,
        "recurring_parameters": null,
        "fixed_fee": null,
        "actual_hours": 10,
        "actual_seconds": 36000,
        "status": "active"
    })
}

async fn image(State(calls): State<Arc<StubCalls>>, UrlPath(name): UrlPath<String>) -> Response {
    calls.cover_requests.fetch_add(1, Ordering::SeqCst);
    if name.starts_with("missing") {
        return StatusCode::NOT_FOUND.into_response();
    }
    (StatusCode::OK, format!("image:{name}")).into_response()
}

/// Encode a minimal GLB whose default scene has the given root node names
pub fn glb_with_nodes(names: &[&str]) -> Vec<u8> {
    const GLB_MAGIC: u32 = 0x46546C67;
    const CHUNK_TYPE_JSON: u32 = 0x4E4F534A;

    let nodes: Vec<Value> = names.iter().map(|n| json!({ "name": n })).collect();
    let roots: Vec<usize> = (0..names.len()).collect();
    let document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "name": "Scene", "nodes": roots }],
        "nodes": nodes
    });

    let mut json_bytes = serde_json::to_vec(&document).unwrap();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let total = (12 + 8 + json_bytes.len()) as u32;

    let mut glb = Vec::new();
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&total.to_le_bytes());
    glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_TYPE_JSON.to_le_bytes());
    glb.extend_from_slice(&json_bytes);
    glb
}

/// Write the three building fragments into `dir`
pub fn write_building_models(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join("building-fragments-floor.glb"),
        glb_with_nodes(&["Building", "Windows", "Windows005", "Frame"]),
    )
    .unwrap();
    std::fs::write(
        dir.join("building-fragments-ground.glb"),
        glb_with_nodes(&["Building001", "Windows001", "Windows003", "Frame001"]),
    )
    .unwrap();
    std::fs::write(
        dir.join("building-fragments-roof.glb"),
        glb_with_nodes(&["Building002", "Windows002", "Windows004", "Frame002"]),
    )
    .unwrap();
}

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub upstream: StubUpstream,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance backed by a fresh stub upstream
    pub async fn new() -> Self {
        let upstream = StubUpstream::start().await;
        let temp_dir = TempDir::new().unwrap();
        let models_dir = temp_dir.path().join("models");
        write_building_models(&models_dir);

        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            literal: upstream.literal_config(),
            toggl: upstream.toggl_config(),
            cache: config::CacheConfig {
                static_dir: temp_dir.path().join("static"),
                ttl_seconds: config::DEFAULT_CACHE_TTL_SECONDS,
            },
            models: config::ModelsConfig { dir: models_dir },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        let state = AppState::new(config).unwrap();

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());

        let app = portfolio::build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            upstream,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    pub fn static_dir(&self) -> std::path::PathBuf {
        self.state.config.cache.static_dir.clone()
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        assert!(response.status().is_success(), "GET {path} -> {}", response.status());
        response.json().await.unwrap()
    }
}
