use crate::domain::entities::api_key::{ApiKeyRecord, DailyUsage};
use crate::domain::value_objects::ids::OwnerId;
use crate::infrastructure::db::dto::ApiKeyRow;
use crate::infrastructure::db::stores::api_key_store::{ApiKeyRepositoryError, ApiKeyStore};
use std::sync::Arc;

pub struct ApiKeyRepository {
    store: Arc<dyn ApiKeyStore>,
}

impl ApiKeyRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn ApiKeyStore>) -> Self {
        Self { store }
    }

    /// Fetch a key record by its hash. Returns `None` if it doesn't exist.
    pub async fn get(&self, key_hash: &str) -> Result<Option<ApiKeyRecord>, ApiKeyRepositoryError> {
        self.store
            .get(key_hash)
            .await?
            .map(ApiKeyRecord::try_from)
            .transpose()
    }

    /// Fetch the live key record of an owner.
    pub async fn get_by_owner(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Option<ApiKeyRecord>, ApiKeyRepositoryError> {
        self.store
            .get_by_owner(owner_id.as_str())
            .await?
            .map(ApiKeyRecord::try_from)
            .transpose()
    }

    /// Make `record` the owner's only key and return what was actually stored.
    pub async fn replace_for_owner(
        &self,
        record: &ApiKeyRecord,
    ) -> Result<ApiKeyRecord, ApiKeyRepositoryError> {
        let row = ApiKeyRow::try_from(record)?;
        ApiKeyRecord::try_from(self.store.replace_for_owner(&row).await?)
    }

    /// Delete every key of an owner. Returns the number of keys removed.
    pub async fn delete_by_owner(&self, owner_id: &OwnerId) -> Result<u64, ApiKeyRepositoryError> {
        self.store.delete_by_owner(owner_id.as_str()).await
    }

    /// Write `next` counters if `current` still reflects what is stored.
    pub async fn compare_and_set_usage(
        &self,
        current: &ApiKeyRecord,
        next: DailyUsage,
    ) -> Result<Option<ApiKeyRecord>, ApiKeyRepositoryError> {
        self.store
            .compare_and_set_usage(&current.key_hash, current.usage(), next)
            .await?
            .map(ApiKeyRecord::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiKeyRepository;
    use crate::domain::entities::api_key::{ApiKeyRecord, DailyUsage};
    use crate::domain::value_objects::ids::OwnerId;
    use crate::domain::value_objects::timestamps::Timestamp;
    use crate::infrastructure::db::dto::ApiKeyRow;
    use crate::infrastructure::db::stores::api_key_store::{ApiKeyRepositoryError, ApiKeyStore};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct DummyStore {
        pub replaced: Mutex<Option<ApiKeyRow>>,
        pub deleted_owner: Mutex<Option<String>>,
        pub cas_args: Mutex<Option<(String, DailyUsage, DailyUsage)>>,
        pub get_result: Mutex<Option<ApiKeyRow>>,
        pub fail: bool,
    }

    impl DummyStore {
        fn new() -> Self {
            Self {
                replaced: Mutex::new(None),
                deleted_owner: Mutex::new(None),
                cas_args: Mutex::new(None),
                get_result: Mutex::new(None),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl ApiKeyStore for DummyStore {
        async fn get(&self, _key_hash: &str) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
            if self.fail {
                return Err(ApiKeyRepositoryError::StorageUnavailable);
            }
            Ok(self.get_result.lock().unwrap().clone())
        }

        async fn get_by_owner(
            &self,
            _owner_id: &str,
        ) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
            Ok(self.get_result.lock().unwrap().clone())
        }

        async fn replace_for_owner(
            &self,
            row: &ApiKeyRow,
        ) -> Result<ApiKeyRow, ApiKeyRepositoryError> {
            *self.replaced.lock().unwrap() = Some(row.clone());
            Ok(row.clone())
        }

        async fn delete_by_owner(&self, owner_id: &str) -> Result<u64, ApiKeyRepositoryError> {
            *self.deleted_owner.lock().unwrap() = Some(owner_id.to_string());
            Ok(0)
        }

        async fn compare_and_set_usage(
            &self,
            key_hash: &str,
            expected: DailyUsage,
            next: DailyUsage,
        ) -> Result<Option<ApiKeyRow>, ApiKeyRepositoryError> {
            *self.cas_args.lock().unwrap() = Some((key_hash.to_string(), expected, next));
            Ok(None)
        }
    }

    fn sample_record() -> ApiKeyRecord {
        ApiKeyRecord::new(
            "hash".to_string(),
            "dpk_abcd".to_string(),
            OwnerId::new("owner"),
            Timestamp::now_utc(),
        )
    }

    #[tokio::test]
    async fn given_record_when_replace_for_owner_should_store_row_and_return_record() {
        let store = Arc::new(DummyStore::new());
        let repo = ApiKeyRepository::new(store.clone());
        let record = sample_record();

        let stored = repo.replace_for_owner(&record).await.unwrap();

        assert_eq!(stored, record);
        assert_eq!(
            store.replaced.lock().unwrap().as_ref().unwrap().owner_id,
            "owner"
        );
    }

    #[tokio::test]
    async fn given_existing_key_when_get_should_return_record() {
        let store = Arc::new(DummyStore::new());
        let repo = ApiKeyRepository::new(store.clone());
        let record = sample_record();
        *store.get_result.lock().unwrap() = Some(ApiKeyRow::try_from(&record).unwrap());

        let fetched = repo.get("hash").await.unwrap();

        assert_eq!(fetched, Some(record));
    }

    #[tokio::test]
    async fn given_row_with_negative_counter_when_get_should_return_invalid_input() {
        let store = Arc::new(DummyStore::new());
        let repo = ApiKeyRepository::new(store.clone());
        let mut row = ApiKeyRow::try_from(&sample_record()).unwrap();
        row.requests_today = -1;
        *store.get_result.lock().unwrap() = Some(row);

        let result = repo.get("hash").await;

        assert_eq!(result, Err(ApiKeyRepositoryError::InvalidInput));
    }

    #[tokio::test]
    async fn given_failing_store_when_get_should_return_storage_unavailable() {
        let mut store = DummyStore::new();
        store.fail = true;
        let repo = ApiKeyRepository::new(Arc::new(store));

        let result = repo.get("hash").await;

        assert_eq!(result, Err(ApiKeyRepositoryError::StorageUnavailable));
    }

    #[tokio::test]
    async fn given_record_when_compare_and_set_should_expect_current_usage() {
        let store = Arc::new(DummyStore::new());
        let repo = ApiKeyRepository::new(store.clone());
        let record = sample_record();
        let next = DailyUsage {
            requests_today: 1,
            last_request_date: record.last_request_date,
        };

        let result = repo.compare_and_set_usage(&record, next).await.unwrap();

        assert!(result.is_none());
        let (hash, expected, sent) = store.cas_args.lock().unwrap().clone().unwrap();
        assert_eq!(hash, "hash");
        assert_eq!(expected, record.usage());
        assert_eq!(sent, next);
    }

    #[tokio::test]
    async fn given_owner_when_delete_by_owner_should_call_store() {
        let store = Arc::new(DummyStore::new());
        let repo = ApiKeyRepository::new(store.clone());

        repo.delete_by_owner(&OwnerId::new("owner-9")).await.unwrap();

        assert_eq!(
            store.deleted_owner.lock().unwrap().as_deref(),
            Some("owner-9")
        );
    }
}
