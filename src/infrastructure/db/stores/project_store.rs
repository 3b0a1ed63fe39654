use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::ProjectRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectRepositoryError {
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for ProjectRepositoryError {
    fn from(_: DatabaseError) -> Self {
        ProjectRepositoryError::StorageUnavailable
    }
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// List an owner's projects, newest first, at most `limit` rows.
    async fn list_by_owner(
        &self,
        owner_id: &str,
        limit: u32,
    ) -> Result<Vec<ProjectRow>, ProjectRepositoryError>;
    /// Delete every project of an owner and return how many were removed.
    async fn delete_by_owner(&self, owner_id: &str) -> Result<u64, ProjectRepositoryError>;
}
