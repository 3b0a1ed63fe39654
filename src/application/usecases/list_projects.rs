// Use case: list_projects.

use crate::application::context::AppContext;
use crate::domain::entities::project::ProjectSummary;
use crate::domain::value_objects::ids::OwnerId;

/// Lists an owner's projects for a caller admitted by the quota gate.
pub struct ListProjectsUseCase;

#[derive(Debug, Clone)]
pub struct ListProjectsCommand {
    pub owner_id: OwnerId,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListProjectsError {
    InvalidLimit,
    Storage(String),
}

impl ListProjectsUseCase {
    pub async fn execute(
        ctx: &AppContext,
        cmd: ListProjectsCommand,
    ) -> Result<Vec<ProjectSummary>, ListProjectsError> {
        if cmd.limit == 0 {
            return Err(ListProjectsError::InvalidLimit);
        }
        ctx.repos
            .project
            .list_by_owner(&cmd.owner_id, cmd.limit)
            .await
            .map_err(|e| ListProjectsError::Storage(format!("{e:?}")))
    }
}
