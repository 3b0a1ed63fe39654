use crate::infrastructure::db::dto::SessionRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::session_store::{SessionRepositoryError, SessionStore};
use async_trait::async_trait;
use sqlx::PgConnection;

/// Reads the `session` table maintained by the login front's session adapter.
#[derive(Clone)]
pub struct SessionStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl SessionStorePostgres {
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn get_active_impl_conn(
        conn: &mut PgConnection,
        sid: &str,
    ) -> Result<Option<SessionRow>, SessionRepositoryError> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT sid, sess, expire
            FROM session
            WHERE sid = $1 AND expire > NOW()",
        )
        .bind(sid)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| SessionRepositoryError::StorageUnavailable)?;

        Ok(row)
    }
}

#[async_trait]
impl SessionStore for SessionStorePostgres {
    async fn get_active(&self, sid: &str) -> Result<Option<SessionRow>, SessionRepositoryError> {
        let sid = sid.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::get_active_impl_conn(conn, &sid).await })
            })
            .await
    }
}
