// Use case: delete_account.

use crate::application::context::AppContext;
use crate::domain::value_objects::ids::OwnerId;

/// Removes the data this service owns for an account: API keys first, then projects.
///
/// Keys go first so a partially failed deletion never leaves a usable key behind.
/// Profile documents, media and the identity record live with external services.
pub struct DeleteAccountUseCase;

#[derive(Debug, Clone)]
pub struct DeleteAccountCommand {
    pub owner_id: OwnerId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAccountResult {
    pub revoked_keys: u64,
    pub deleted_projects: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteAccountError {
    Storage(String),
}

impl DeleteAccountUseCase {
    pub async fn execute(
        ctx: &AppContext,
        cmd: DeleteAccountCommand,
    ) -> Result<DeleteAccountResult, DeleteAccountError> {
        // Step 1: Revoke every key of the owner.
        let revoked_keys = ctx
            .repos
            .api_key
            .delete_by_owner(&cmd.owner_id)
            .await
            .map_err(|e| DeleteAccountError::Storage(format!("{e:?}")))?;

        // Step 2: Delete the owner's projects.
        let deleted_projects = ctx
            .repos
            .project
            .delete_by_owner(&cmd.owner_id)
            .await
            .map_err(|e| DeleteAccountError::Storage(format!("{e:?}")))?;

        Ok(DeleteAccountResult {
            revoked_keys,
            deleted_projects,
        })
    }
}
