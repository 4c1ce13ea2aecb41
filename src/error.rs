//! Error types for the portfolio backend
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A credential needed for an upstream call is not configured (500)
    #[error("{0} is not defined")]
    MissingCredentials(&'static str),

    /// HTTP client error (502)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Literal rejected the login mutation (502)
    #[error("Literal login error: {0}")]
    LiteralLogin(String),

    /// Literal returned GraphQL errors (502)
    #[error("Literal API error: {0}")]
    Literal(String),

    /// Toggl answered with a non-success status (502)
    #[error("Toggl API error ({status}): {body}")]
    Toggl { status: u16, body: String },

    /// Model file could not be parsed (500)
    #[error("Model error: {0}")]
    Model(String),

    /// Filesystem error (500)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error (500)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl AppError {
    /// Short label used for the error metric
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::MissingCredentials(_) => "missing_credentials",
            AppError::HttpClient(_) => "http_client",
            AppError::LiteralLogin(_) | AppError::Literal(_) => "literal",
            AppError::Toggl { .. } => "toggl",
            AppError::Model(_) => "model",
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to appropriate HTTP status code
    /// and JSON error body.
    fn into_response(self) -> Response {
        use axum::Json;

        let (status, error_message) = match &self {
            AppError::HttpClient(_)
            | AppError::LiteralLogin(_)
            | AppError::Literal(_)
            | AppError::Toggl { .. } => (StatusCode::BAD_GATEWAY, self.to_string()),
            AppError::Config(_) | AppError::MissingCredentials(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server is misconfigured".to_string(),
            ),
            AppError::Model(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Io(_) | AppError::Json(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[self.kind()]).inc();

        let body = Json(serde_json::json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
