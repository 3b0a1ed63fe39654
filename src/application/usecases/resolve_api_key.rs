// Use case: resolve_api_key.

use crate::application::context::AppContext;
use crate::application::shared::api_key_helpers::api_key_hash;
use crate::application::shared::api_key_types::ApiKeyUseCaseError;
use crate::domain::entities::api_key::ApiKeyRecord;

/// Maps a presented raw key to its record.
pub struct ResolveApiKeyUseCase;

impl ResolveApiKeyUseCase {
    /// Look up a key by exact match. Unknown keys are `NotFound`.
    pub async fn execute(
        ctx: &AppContext,
        raw_key: &str,
    ) -> Result<ApiKeyRecord, ApiKeyUseCaseError> {
        if raw_key.is_empty() {
            return Err(ApiKeyUseCaseError::NotFound);
        }
        ctx.repos
            .api_key
            .get(&api_key_hash(raw_key))
            .await
            .map_err(|e| ApiKeyUseCaseError::Storage(format!("{e:?}")))?
            .ok_or(ApiKeyUseCaseError::NotFound)
    }
}
