//! Toggl Track v9 workspace records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TogglProject {
    pub id: u64,
    pub workspace_id: u64,
    #[serde(default)]
    pub client_id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub at: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub server_deleted_at: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub billable: Option<bool>,
    #[serde(default)]
    pub template: Option<bool>,
    #[serde(default)]
    pub auto_estimates: Option<bool>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub rate_last_updated: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurring_parameters: Option<serde_json::Value>,
    #[serde(default)]
    pub fixed_fee: Option<f64>,
    #[serde(default)]
    pub actual_hours: Option<f64>,
    #[serde(default)]
    pub actual_seconds: Option<f64>,
    #[serde(default)]
    pub status: String,
    /// Joined locally from the workspace client list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<TogglClient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TogglClient {
    pub id: u64,
    pub wid: u64,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub at: String,
    #[serde(default)]
    pub creator_id: u64,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub external_reference: Option<String>,
    #[serde(default)]
    pub integration_ext_id: Option<String>,
    #[serde(default)]
    pub integration_ext_type: Option<String>,
    #[serde(default)]
    pub integration_provider: Option<serde_json::Value>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    #[serde(default)]
    pub total_count: Option<u64>,
}
