use std::sync::Arc;

use crate::infrastructure::db::database::{Database, DatabaseError};
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::postgres::api_key_store_postgres::ApiKeyStorePostgres;
use crate::infrastructure::db::postgres::project_store_postgres::ProjectStorePostgres;
use crate::infrastructure::db::postgres::session_store_postgres::SessionStorePostgres;
use crate::infrastructure::db::repositories::api_key_repository::ApiKeyRepository;
use crate::infrastructure::db::repositories::project_repository::ProjectRepository;
use crate::infrastructure::db::repositories::session_repository::SessionRepository;
use crate::infrastructure::db::stores::api_key_store::ApiKeyStore;
use crate::infrastructure::db::stores::project_store::ProjectStore;
use crate::infrastructure::db::stores::session_store::SessionStore;

#[derive(Clone)]
pub struct Repositories {
    pub db: Option<Arc<PostgresDatabase>>,
    pub api_key: Arc<ApiKeyRepository>,
    pub project: Arc<ProjectRepository>,
    pub session: Arc<SessionRepository>,
}

impl Repositories {
    /// Build all repositories backed by Postgres stores.
    pub fn postgres(db: Arc<PostgresDatabase>) -> Self {
        let api_key_store = Arc::new(ApiKeyStorePostgres::new(db.clone()));
        let project_store = Arc::new(ProjectStorePostgres::new(db.clone()));
        let session_store = Arc::new(SessionStorePostgres::new(db.clone()));

        Self {
            db: Some(db),
            api_key: Arc::new(ApiKeyRepository::new(api_key_store)),
            project: Arc::new(ProjectRepository::new(project_store)),
            session: Arc::new(SessionRepository::new(session_store)),
        }
    }

    /// Build repositories over arbitrary stores (no database handle for raw queries).
    pub fn from_stores(
        api_key: Arc<dyn ApiKeyStore>,
        project: Arc<dyn ProjectStore>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            db: None,
            api_key: Arc::new(ApiKeyRepository::new(api_key)),
            project: Arc::new(ProjectRepository::new(project)),
            session: Arc::new(SessionRepository::new(session)),
        }
    }

    /// Execute a raw SQL statement outside a transaction.
    pub async fn execute(&self, query: &str) -> Result<u64, DatabaseError> {
        let Some(db) = self.db.as_ref() else {
            return Err(DatabaseError::Connection("db_unavailable".to_string()));
        };
        db.execute(query).await
    }

    /// Close the underlying pool, if any.
    pub async fn close(&self) {
        if let Some(db) = self.db.as_ref() {
            db.close().await;
        }
    }
}
