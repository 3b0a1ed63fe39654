use crate::domain::value_objects::ids::{OwnerId, ProjectId};
use crate::domain::value_objects::timestamps::Timestamp;

/// Read model of a portfolio project, as served to API-key callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub picture_url: Option<String>,
    pub created_at: Timestamp,
}
