use crate::domain::entities::project::ProjectSummary;
use crate::interface::http::dto::api_keys::format_rfc3339;
use serde::{Deserialize, Serialize};

/// Raw query of the public listing; `limit` is validated by the handler.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectsQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    pub created_at: String,
}

impl From<ProjectSummary> for ProjectResponse {
    fn from(project: ProjectSummary) -> Self {
        Self {
            id: project.id.as_uuid().to_string(),
            title: project.title,
            description: project.description,
            repo_url: project.repo_url,
            live_url: project.live_url,
            picture_url: project.picture_url,
            created_at: format_rfc3339(project.created_at.into_inner()),
        }
    }
}

/// `type` is the success indicator existing API clients check.
#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    #[serde(rename = "type")]
    pub ok: bool,
    pub projects: Vec<ProjectResponse>,
}
