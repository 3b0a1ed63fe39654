use crate::infrastructure::db::dto::ProjectRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::project_store::{ProjectRepositoryError, ProjectStore};
use async_trait::async_trait;
use sqlx::PgConnection;

#[derive(Clone)]
pub struct ProjectStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl ProjectStorePostgres {
    /// Build a Postgres-backed project store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn list_by_owner_impl_conn(
        conn: &mut PgConnection,
        owner_id: &str,
        limit: u32,
    ) -> Result<Vec<ProjectRow>, ProjectRepositoryError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT
                id,
                owner_id,
                title,
                description,
                repo_url,
                live_url,
                picture_url,
                created_at
            FROM projects
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2",
        )
        .bind(owner_id)
        .bind(i64::from(limit))
        .fetch_all(&mut *conn)
        .await
        .map_err(|_| ProjectRepositoryError::StorageUnavailable)?;

        Ok(rows)
    }

    async fn delete_by_owner_impl_conn(
        conn: &mut PgConnection,
        owner_id: &str,
    ) -> Result<u64, ProjectRepositoryError> {
        let result = sqlx::query("DELETE FROM projects WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&mut *conn)
            .await
            .map_err(|_| ProjectRepositoryError::StorageUnavailable)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ProjectStore for ProjectStorePostgres {
    async fn list_by_owner(
        &self,
        owner_id: &str,
        limit: u32,
    ) -> Result<Vec<ProjectRow>, ProjectRepositoryError> {
        let owner_id = owner_id.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::list_by_owner_impl_conn(conn, &owner_id, limit).await })
            })
            .await
    }

    async fn delete_by_owner(&self, owner_id: &str) -> Result<u64, ProjectRepositoryError> {
        let owner_id = owner_id.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::delete_by_owner_impl_conn(conn, &owner_id).await })
            })
            .await
    }
}
