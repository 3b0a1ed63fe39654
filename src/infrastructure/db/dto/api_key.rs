use crate::domain::entities::api_key::ApiKeyRecord;
use crate::domain::value_objects::ids::OwnerId;
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::db::stores::api_key_store::ApiKeyRepositoryError;
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ApiKeyRow {
    pub key_hash: String,
    pub key_prefix: String,
    pub owner_id: String,
    pub requests_today: i32,
    pub last_request_date: Date,
    pub created_at: OffsetDateTime,
}

/// Counters outside the column's range are rejected, never clamped.
impl TryFrom<&ApiKeyRecord> for ApiKeyRow {
    type Error = ApiKeyRepositoryError;

    fn try_from(record: &ApiKeyRecord) -> Result<Self, Self::Error> {
        let requests_today = i32::try_from(record.requests_today)
            .map_err(|_| ApiKeyRepositoryError::InvalidInput)?;
        Ok(Self {
            key_hash: record.key_hash.clone(),
            key_prefix: record.key_prefix.clone(),
            owner_id: record.owner_id.0.clone(),
            requests_today,
            last_request_date: record.last_request_date,
            created_at: record.created_at.as_inner(),
        })
    }
}

impl TryFrom<ApiKeyRow> for ApiKeyRecord {
    type Error = ApiKeyRepositoryError;

    fn try_from(row: ApiKeyRow) -> Result<Self, Self::Error> {
        let requests_today =
            u32::try_from(row.requests_today).map_err(|_| ApiKeyRepositoryError::InvalidInput)?;
        Ok(Self {
            key_hash: row.key_hash,
            key_prefix: row.key_prefix,
            owner_id: OwnerId(row.owner_id),
            requests_today,
            last_request_date: row.last_request_date,
            created_at: Timestamp::from(row.created_at),
        })
    }
}
