use crate::domain::entities::project::ProjectSummary;
use crate::domain::value_objects::ids::{OwnerId, ProjectId};
use crate::domain::value_objects::timestamps::Timestamp;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: uuid::Uuid,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub repo_url: Option<String>,
    pub live_url: Option<String>,
    pub picture_url: Option<String>,
    pub created_at: OffsetDateTime,
}

impl From<ProjectRow> for ProjectSummary {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: ProjectId::from(row.id),
            owner_id: OwnerId(row.owner_id),
            title: row.title,
            description: row.description,
            repo_url: row.repo_url,
            live_url: row.live_url,
            picture_url: row.picture_url,
            created_at: Timestamp::from(row.created_at),
        }
    }
}
