use crate::domain::value_objects::ids::OwnerId;
use crate::infrastructure::db::stores::session_store::{SessionRepositoryError, SessionStore};
use std::sync::Arc;

pub struct SessionRepository {
    store: Arc<dyn SessionStore>,
}

impl SessionRepository {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Owner logged in on session `sid`. `None` for unknown, expired or anonymous sessions.
    pub async fn owner_for_session(
        &self,
        sid: &str,
    ) -> Result<Option<OwnerId>, SessionRepositoryError> {
        let session = self.store.get_active(sid).await?;
        Ok(session.and_then(|s| s.owner_id().map(OwnerId::new)))
    }
}
