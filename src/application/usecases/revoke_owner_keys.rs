// Use case: revoke_owner_keys.

use crate::application::context::AppContext;
use crate::application::shared::api_key_types::ApiKeyUseCaseError;
use crate::domain::value_objects::ids::OwnerId;

/// Revokes every API key of an owner.
pub struct RevokeOwnerKeysUseCase;

/// Input for key revocation.
#[derive(Debug, Clone)]
pub struct RevokeOwnerKeysCommand {
    pub owner_id: OwnerId,
}

/// Result of a revoke attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevokeOwnerKeysResult {
    pub revoked: u64,
}

impl RevokeOwnerKeysUseCase {
    /// Delete all keys of the owner. Owners without keys are a no-op.
    pub async fn execute(
        ctx: &AppContext,
        cmd: RevokeOwnerKeysCommand,
    ) -> Result<RevokeOwnerKeysResult, ApiKeyUseCaseError> {
        let revoked = ctx
            .repos
            .api_key
            .delete_by_owner(&cmd.owner_id)
            .await
            .map_err(|e| ApiKeyUseCaseError::Storage(format!("{e:?}")))?;

        Ok(RevokeOwnerKeysResult { revoked })
    }
}
