// Use case: issue_api_key.

use crate::application::context::AppContext;
use crate::application::shared::api_key_helpers::generate_api_key;
use crate::application::shared::api_key_types::{ApiKeyUseCaseError, IssuedApiKey};
use crate::domain::entities::api_key::ApiKeyRecord;
use crate::domain::value_objects::ids::OwnerId;
use crate::domain::value_objects::timestamps::Timestamp;
use metrics::counter;

/// Issues a new API key for an owner, replacing whatever key they had.
pub struct IssueApiKeyUseCase;

/// Input for key issuance. `owner_id` comes from an authenticated session.
#[derive(Debug, Clone)]
pub struct IssueApiKeyCommand {
    pub owner_id: OwnerId,
}

impl IssueApiKeyUseCase {
    /// Generate a key and make it the owner's only live key.
    pub async fn execute(
        ctx: &AppContext,
        cmd: IssueApiKeyCommand,
    ) -> Result<IssuedApiKey, ApiKeyUseCaseError> {
        // Step 1: Generate the raw key and its stored lookup fields.
        let (raw_key, key_prefix, key_hash) = generate_api_key();
        let record = ApiKeyRecord::new(key_hash, key_prefix, cmd.owner_id, Timestamp::now_utc());

        // Step 2: Swap the owner's key set in one storage step.
        let stored = ctx
            .repos
            .api_key
            .replace_for_owner(&record)
            .await
            .map_err(|e| ApiKeyUseCaseError::Storage(format!("{e:?}")))?;

        counter!("api_keys_issued_total").increment(1);

        // Step 3: Hand the raw key back once.
        Ok(IssuedApiKey {
            api_key: raw_key,
            record: stored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{IssueApiKeyCommand, IssueApiKeyUseCase};
    use crate::application::context::test_support::TestStores;
    use crate::application::shared::api_key_helpers::api_key_hash;
    use crate::application::shared::api_key_types::ApiKeyUseCaseError;
    use crate::application::usecases::resolve_api_key::ResolveApiKeyUseCase;
    use crate::domain::value_objects::ids::OwnerId;
    use crate::domain::value_objects::timestamps::today_utc;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn given_new_owner_when_issue_should_store_fresh_record() {
        let stores = TestStores::new();
        let ctx = stores.context(100);

        let issued = IssueApiKeyUseCase::execute(
            &ctx,
            IssueApiKeyCommand {
                owner_id: OwnerId::new("owner-1"),
            },
        )
        .await
        .unwrap();

        assert_eq!(issued.record.key_hash, api_key_hash(&issued.api_key));
        assert_eq!(issued.record.requests_today, 0);
        assert_eq!(issued.record.last_request_date, today_utc());
        assert_eq!(stores.api_keys.rows_for_owner("owner-1").len(), 1);
    }

    #[tokio::test]
    async fn given_existing_key_when_issue_again_should_leave_one_and_invalidate_first() {
        let stores = TestStores::new();
        let ctx = stores.context(100);
        let cmd = IssueApiKeyCommand {
            owner_id: OwnerId::new("owner-1"),
        };

        let first = IssueApiKeyUseCase::execute(&ctx, cmd.clone()).await.unwrap();
        let second = IssueApiKeyUseCase::execute(&ctx, cmd).await.unwrap();

        assert_ne!(first.api_key, second.api_key);
        assert_eq!(stores.api_keys.rows_for_owner("owner-1").len(), 1);
        let old = ResolveApiKeyUseCase::execute(&ctx, &first.api_key).await;
        assert_eq!(old.unwrap_err(), ApiKeyUseCaseError::NotFound);
        let current = ResolveApiKeyUseCase::execute(&ctx, &second.api_key)
            .await
            .unwrap();
        assert_eq!(current.owner_id.as_str(), "owner-1");
    }

    #[tokio::test]
    async fn given_other_owner_key_when_issue_should_not_touch_it() {
        let stores = TestStores::new();
        let ctx = stores.context(100);

        IssueApiKeyUseCase::execute(
            &ctx,
            IssueApiKeyCommand {
                owner_id: OwnerId::new("owner-a"),
            },
        )
        .await
        .unwrap();
        IssueApiKeyUseCase::execute(
            &ctx,
            IssueApiKeyCommand {
                owner_id: OwnerId::new("owner-b"),
            },
        )
        .await
        .unwrap();

        assert_eq!(stores.api_keys.rows_for_owner("owner-a").len(), 1);
        assert_eq!(stores.api_keys.rows_for_owner("owner-b").len(), 1);
    }

    #[tokio::test]
    async fn given_failing_store_when_issue_should_return_storage_error_and_keep_old_key() {
        let stores = TestStores::new();
        let ctx = stores.context(100);
        let cmd = IssueApiKeyCommand {
            owner_id: OwnerId::new("owner-1"),
        };
        let first = IssueApiKeyUseCase::execute(&ctx, cmd.clone()).await.unwrap();
        stores.api_keys.fail_writes.store(true, Ordering::SeqCst);

        let result = IssueApiKeyUseCase::execute(&ctx, cmd).await;

        assert!(matches!(result, Err(ApiKeyUseCaseError::Storage(_))));
        let rows = stores.api_keys.rows_for_owner("owner-1");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key_hash, first.record.key_hash);
    }
}
