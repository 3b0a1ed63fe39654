use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::SessionRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRepositoryError {
    StorageUnavailable,
}

impl From<DatabaseError> for SessionRepositoryError {
    fn from(_: DatabaseError) -> Self {
        SessionRepositoryError::StorageUnavailable
    }
}

/// Read access to sessions persisted by the login front.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session by id. Expired sessions are reported as `None`.
    async fn get_active(&self, sid: &str) -> Result<Option<SessionRow>, SessionRepositoryError>;
}
