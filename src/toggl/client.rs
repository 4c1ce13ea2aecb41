//! Toggl Track REST client

use std::sync::Arc;
use std::time::Instant;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::de::DeserializeOwned;

use super::models::{TogglClient, TogglProject};
use crate::config::TogglConfig;
use crate::error::AppError;
use crate::metrics::observe_upstream;

/// Toggl API client scoped to the configured workspace
pub struct TogglService {
    http_client: Arc<reqwest::Client>,
    api_url: String,
    api_token: String,
    workspace_id: u64,
}

/// `Basic base64("<token>:api_token")`, the Toggl token login scheme
pub fn basic_auth_header(api_token: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{api_token}:api_token")))
}

impl TogglService {
    pub fn new(config: &TogglConfig, http_client: Arc<reqwest::Client>) -> Self {
        if config.api_token.is_empty() {
            tracing::warn!("TOGGL_API_TOKEN is not defined");
        }

        Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            workspace_id: config.workspace_id,
        }
    }

    /// List projects in the workspace
    pub async fn get_projects(&self) -> Result<Vec<TogglProject>, AppError> {
        self.get_workspace_resource("projects").await
    }

    /// List clients in the workspace
    pub async fn get_clients(&self) -> Result<Vec<TogglClient>, AppError> {
        self.get_workspace_resource("clients").await
    }

    async fn get_workspace_resource<T: DeserializeOwned>(
        &self,
        resource: &str,
    ) -> Result<T, AppError> {
        if self.api_token.is_empty() {
            return Err(AppError::MissingCredentials("TOGGL_API_TOKEN"));
        }

        let url = format!(
            "{}/workspaces/{}/{}",
            self.api_url, self.workspace_id, resource
        );
        let started = Instant::now();

        let response = match self
            .http_client
            .get(&url)
            .header("Authorization", basic_auth_header(&self.api_token))
            .header("Content-Type", "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                observe_upstream("toggl", "error", started);
                return Err(e.into());
            }
        };

        let status = response.status();
        observe_upstream("toggl", status.as_str(), started);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, resource, "Toggl request failed");
            return Err(AppError::Toggl {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
