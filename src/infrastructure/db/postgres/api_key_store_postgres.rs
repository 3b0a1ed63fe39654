use crate::domain::entities::api_key::DailyUsage;
use crate::infrastructure::db::dto::ApiKeyRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::api_key_store::{ApiKeyRepositoryError, ApiKeyStore};
use async_trait::async_trait;
use sqlx::PgConnection;

const API_KEY_COLUMNS: &str = "
    key_hash,
    key_prefix,
    owner_id,
    requests_today,
    last_request_date,
    created_at";

#[derive(Clone)]
pub struct ApiKeyStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

fn map_write_error(err: sqlx::Error) -> ApiKeyRepositoryError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => ApiKeyRepositoryError::Conflict,
        sqlx::Error::Database(db) if db.is_check_violation() => {
            ApiKeyRepositoryError::InvalidInput
        }
        _ => ApiKeyRepositoryError::StorageUnavailable,
    }
}

fn to_db_count(value: u32) -> Result<i32, ApiKeyRepositoryError> {
    i32::try_from(value).map_err(|_| ApiKeyRepositoryError::InvalidInput)
}

impl ApiKeyStorePostgres {
    /// Build a Postgres-backed API key store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn get_impl_conn(
        conn: &mut PgConnection,
        key_hash: &str,
    ) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(&format!(
            "SELECT {API_KEY_COLUMNS} FROM api_keys WHERE key_hash = $1"
        ))
        .bind(key_hash)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| ApiKeyRepositoryError::StorageUnavailable)?;

        Ok(row)
    }

    async fn get_by_owner_impl_conn(
        conn: &mut PgConnection,
        owner_id: &str,
    ) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(&format!(
            "SELECT {API_KEY_COLUMNS}
            FROM api_keys
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT 1"
        ))
        .bind(owner_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| ApiKeyRepositoryError::StorageUnavailable)?;

        Ok(row)
    }

    async fn insert_impl_conn(
        conn: &mut PgConnection,
        row: &ApiKeyRow,
    ) -> Result<ApiKeyRow, ApiKeyRepositoryError> {
        let stored = sqlx::query_as::<_, ApiKeyRow>(&format!(
            "INSERT INTO api_keys ({API_KEY_COLUMNS})
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING {API_KEY_COLUMNS}"
        ))
        .bind(&row.key_hash)
        .bind(&row.key_prefix)
        .bind(&row.owner_id)
        .bind(row.requests_today)
        .bind(row.last_request_date)
        .bind(row.created_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_write_error)?;

        Ok(stored)
    }

    async fn delete_by_owner_impl_conn(
        conn: &mut PgConnection,
        owner_id: &str,
    ) -> Result<u64, ApiKeyRepositoryError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&mut *conn)
            .await
            .map_err(|_| ApiKeyRepositoryError::StorageUnavailable)?;

        Ok(result.rows_affected())
    }

    async fn compare_and_set_usage_impl_conn(
        conn: &mut PgConnection,
        key_hash: &str,
        expected: DailyUsage,
        next: DailyUsage,
    ) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
        let row = sqlx::query_as::<_, ApiKeyRow>(&format!(
            "UPDATE api_keys SET
                requests_today = $4,
                last_request_date = $5
            WHERE key_hash = $1
                AND requests_today = $2
                AND last_request_date = $3
            RETURNING {API_KEY_COLUMNS}"
        ))
        .bind(key_hash)
        .bind(to_db_count(expected.requests_today)?)
        .bind(expected.last_request_date)
        .bind(to_db_count(next.requests_today)?)
        .bind(next.last_request_date)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_write_error)?;

        Ok(row)
    }
}

#[async_trait]
impl ApiKeyStore for ApiKeyStorePostgres {
    async fn get(&self, key_hash: &str) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
        let key_hash = key_hash.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::get_impl_conn(conn, &key_hash).await })
            })
            .await
    }

    async fn get_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
        let owner_id = owner_id.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::get_by_owner_impl_conn(conn, &owner_id).await })
            })
            .await
    }

    async fn replace_for_owner(&self, row: &ApiKeyRow) -> Result<ApiKeyRow, ApiKeyRepositoryError> {
        let row = row.clone();
        // Delete and insert share one transaction: readers see the old key or the new one.
        self.db
            .with_tx(move |tx| {
                Box::pin(async move {
                    Self::delete_by_owner_impl_conn(&mut *tx, &row.owner_id).await?;
                    Self::insert_impl_conn(&mut *tx, &row).await
                })
            })
            .await
    }

    async fn delete_by_owner(&self, owner_id: &str) -> Result<u64, ApiKeyRepositoryError> {
        let owner_id = owner_id.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::delete_by_owner_impl_conn(conn, &owner_id).await })
            })
            .await
    }

    async fn compare_and_set_usage(
        &self,
        key_hash: &str,
        expected: DailyUsage,
        next: DailyUsage,
    ) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
        let key_hash = key_hash.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move {
                    Self::compare_and_set_usage_impl_conn(conn, &key_hash, expected, next).await
                })
            })
            .await
    }
}
