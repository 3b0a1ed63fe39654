use crate::domain::entities::project::ProjectSummary;
use crate::domain::value_objects::ids::OwnerId;
use crate::infrastructure::db::stores::project_store::{ProjectRepositoryError, ProjectStore};
use std::sync::Arc;

pub struct ProjectRepository {
    store: Arc<dyn ProjectStore>,
}

impl ProjectRepository {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// Newest projects of an owner, at most `limit` of them.
    pub async fn list_by_owner(
        &self,
        owner_id: &OwnerId,
        limit: u32,
    ) -> Result<Vec<ProjectSummary>, ProjectRepositoryError> {
        if limit == 0 {
            return Err(ProjectRepositoryError::InvalidInput);
        }
        let rows = self.store.list_by_owner(owner_id.as_str(), limit).await?;
        Ok(rows.into_iter().map(ProjectSummary::from).collect())
    }

    pub async fn delete_by_owner(&self, owner_id: &OwnerId) -> Result<u64, ProjectRepositoryError> {
        self.store.delete_by_owner(owner_id.as_str()).await
    }
}
