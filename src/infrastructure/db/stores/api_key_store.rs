use crate::domain::entities::api_key::DailyUsage;
use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::ApiKeyRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyRepositoryError {
    Conflict,
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for ApiKeyRepositoryError {
    fn from(_: DatabaseError) -> Self {
        ApiKeyRepositoryError::StorageUnavailable
    }
}

#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Fetch an API key by its hash. Returns `None` if it doesn't exist.
    async fn get(&self, key_hash: &str) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError>;
    /// Fetch the live API key of an owner, if any.
    async fn get_by_owner(&self, owner_id: &str)
    -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError>;
    /// Replace every key of `row.owner_id` with `row` in one atomic step and return
    /// exactly what was stored. Never leaves zero-then-two keys visible.
    async fn replace_for_owner(&self, row: &ApiKeyRow) -> Result<ApiKeyRow, ApiKeyRepositoryError>;
    /// Delete every key of an owner and return how many were removed (0 is not an error).
    async fn delete_by_owner(&self, owner_id: &str) -> Result<u64, ApiKeyRepositoryError>;
    /// Set the usage counters only if they still equal `expected`.
    ///
    /// Returns the stored row on success and `None` when another writer got there
    /// first (or the key is gone).
    async fn compare_and_set_usage(
        &self,
        key_hash: &str,
        expected: DailyUsage,
        next: DailyUsage,
    ) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError>;
}
