//! GraphQL request/response envelopes

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

/// Response envelope; `data` is kept untyped until errors are checked
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True when any error says the bearer token was rejected
    pub fn is_unauthenticated(&self) -> bool {
        self.errors.iter().any(GraphQLError::is_unauthenticated)
    }

    /// Error messages joined with ", "
    pub fn error_messages(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorExtensions {
    #[serde(default)]
    pub code: Option<String>,
}

impl GraphQLError {
    pub fn is_unauthenticated(&self) -> bool {
        self.message.contains("unauthorized")
            || self
                .extensions
                .as_ref()
                .and_then(|ext| ext.code.as_deref())
                == Some("UNAUTHENTICATED")
    }
}
