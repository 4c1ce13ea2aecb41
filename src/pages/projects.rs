//! Project list page

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProjectSource;
use super::snapshot::{Snapshot, SnapshotStore};
use crate::error::AppError;
use crate::metrics::ERRORS_TOTAL;
use crate::toggl::{TogglClient, TogglProject};

/// Snapshot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectList {
    pub projects: Vec<TogglProject>,
}

/// Response of the project list page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectsPage {
    pub projects: Vec<TogglProject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProjectsPage {
    fn failed() -> Self {
        Self {
            projects: Vec::new(),
            cached: None,
            error: Some("Failed to load projects".to_string()),
        }
    }
}

impl From<Snapshot<ProjectList>> for ProjectsPage {
    fn from(snapshot: Snapshot<ProjectList>) -> Self {
        Self {
            projects: snapshot.data.projects,
            cached: Some(snapshot.cached),
            error: None,
        }
    }
}

/// Attach to each project the client whose id equals its `client_id`
pub fn attach_clients(projects: Vec<TogglProject>, clients: &[TogglClient]) -> Vec<TogglProject> {
    let mut by_id: HashMap<u64, &TogglClient> = HashMap::with_capacity(clients.len());
    for client in clients {
        by_id.entry(client.id).or_insert(client);
    }

    projects
        .into_iter()
        .map(|mut project| {
            project.client = project
                .client_id
                .and_then(|id| by_id.get(&id))
                .map(|client| (*client).clone());
            project
        })
        .collect()
}

pub struct ProjectsLoader {
    source: Arc<dyn ProjectSource>,
    snapshot: SnapshotStore,
}

impl ProjectsLoader {
    pub fn new(source: Arc<dyn ProjectSource>, snapshot: SnapshotStore) -> Self {
        Self { source, snapshot }
    }

    /// Load the project list; never fails
    pub async fn load(&self) -> ProjectsPage {
        match self.try_load(Utc::now()).await {
            Ok(page) => page,
            Err(error) => {
                tracing::error!(%error, "Failed to load projects from Toggl");
                ERRORS_TOTAL.with_label_values(&[error.kind()]).inc();
                ProjectsPage::failed()
            }
        }
    }

    pub async fn try_load(&self, now: DateTime<Utc>) -> Result<ProjectsPage, AppError> {
        if let Some(snapshot) = self.snapshot.read_fresh::<ProjectList>(now).await {
            return Ok(snapshot.into());
        }

        let (projects, clients) =
            tokio::try_join!(self.source.projects(), self.source.clients())?;
        let projects = attach_clients(projects, &clients);

        tracing::info!(count = projects.len(), "Project list refreshed");
        let snapshot = self.snapshot.write(ProjectList { projects }, now).await?;
        Ok(snapshot.into())
    }
}
