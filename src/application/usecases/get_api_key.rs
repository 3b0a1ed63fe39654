// Use case: get_api_key.

use crate::application::context::AppContext;
use crate::application::shared::api_key_types::ApiKeyUseCaseError;
use crate::domain::entities::api_key::ApiKeyRecord;
use crate::domain::value_objects::ids::OwnerId;

/// Returns metadata of the owner's live key (never the raw token).
pub struct GetApiKeyUseCase;

impl GetApiKeyUseCase {
    pub async fn execute(
        ctx: &AppContext,
        owner_id: &OwnerId,
    ) -> Result<ApiKeyRecord, ApiKeyUseCaseError> {
        ctx.repos
            .api_key
            .get_by_owner(owner_id)
            .await
            .map_err(|e| ApiKeyUseCaseError::Storage(format!("{e:?}")))?
            .ok_or(ApiKeyUseCaseError::NotFound)
    }
}
