// HTTP routes: API key management for the logged-in owner.

use crate::application::shared::api_key_types::ApiKeyUseCaseError;
use crate::application::usecases::get_api_key::GetApiKeyUseCase;
use crate::application::usecases::issue_api_key::{IssueApiKeyCommand, IssueApiKeyUseCase};
use crate::application::usecases::revoke_owner_keys::{
    RevokeOwnerKeysCommand, RevokeOwnerKeysUseCase,
};
use crate::interface::http::dto::api_keys::{
    ApiKeyMetadataResponse, IssuedApiKeyResponse, RevokeApiKeysResponse, format_rfc3339,
};
use crate::interface::http::problem::{RFA_API_KEY_NOT_FOUND, RFA_STORAGE_DB_ERROR, problem};
use crate::interface::http::session::SessionOwner;
use crate::interface::http::state::AppState;
use crate::interface::http::trace::TraceId;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use tracing::{error, info};

const KEYS_PATH: &str = "/api/keys";

/// Builds the owner's API key routes. Expects the session middleware in front.
pub fn router() -> Router<AppState> {
    Router::new().route(
        KEYS_PATH,
        post(issue_key).get(describe_key).delete(revoke_keys),
    )
}

fn storage_unavailable(trace_id: Option<String>) -> Response {
    problem(
        StatusCode::SERVICE_UNAVAILABLE,
        RFA_STORAGE_DB_ERROR,
        Some("storage unavailable".to_string()),
        Some(KEYS_PATH.to_string()),
        trace_id,
    )
}

/// Issues a new key, replacing any key the owner had.
///
/// Returns the raw key once (for the caller to store safely).
async fn issue_key(
    State(state): State<AppState>,
    Extension(SessionOwner(owner_id)): Extension<SessionOwner>,
    Extension(trace_id): Extension<TraceId>,
) -> Response {
    let trace_id = Some(trace_id.0);
    // Step 1: execute the use case.
    let result = IssueApiKeyUseCase::execute(
        &state.ctx,
        IssueApiKeyCommand {
            owner_id: owner_id.clone(),
        },
    )
    .await;
    // Step 2: map the output to a JSON response.
    match result {
        Ok(issued) => {
            info!(owner_id = %owner_id, key_prefix = %issued.record.key_prefix, "api key issued");
            (
                StatusCode::CREATED,
                Json(IssuedApiKeyResponse {
                    success: true,
                    api_key: issued.api_key,
                    key_prefix: issued.record.key_prefix,
                    created_at: format_rfc3339(issued.record.created_at.into_inner()),
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!(owner_id = %owner_id, error = ?err, "api key issuance failed");
            storage_unavailable(trace_id)
        }
    }
}

/// Describes the owner's live key without exposing it.
async fn describe_key(
    State(state): State<AppState>,
    Extension(SessionOwner(owner_id)): Extension<SessionOwner>,
    Extension(trace_id): Extension<TraceId>,
) -> Response {
    let trace_id = Some(trace_id.0);
    match GetApiKeyUseCase::execute(&state.ctx, &owner_id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiKeyMetadataResponse::from_record(
                &record,
                state.ctx.quota.daily_limit(),
            )),
        )
            .into_response(),
        Err(ApiKeyUseCaseError::NotFound) => problem(
            StatusCode::NOT_FOUND,
            RFA_API_KEY_NOT_FOUND,
            Some("no api key issued".to_string()),
            Some(KEYS_PATH.to_string()),
            trace_id,
        ),
        Err(ApiKeyUseCaseError::Storage(err)) => {
            error!(owner_id = %owner_id, error = %err, "api key lookup failed");
            storage_unavailable(trace_id)
        }
    }
}

/// Revokes every key of the owner. Revoking nothing is not an error.
async fn revoke_keys(
    State(state): State<AppState>,
    Extension(SessionOwner(owner_id)): Extension<SessionOwner>,
    Extension(trace_id): Extension<TraceId>,
) -> Response {
    let trace_id = Some(trace_id.0);
    let result = RevokeOwnerKeysUseCase::execute(
        &state.ctx,
        RevokeOwnerKeysCommand {
            owner_id: owner_id.clone(),
        },
    )
    .await;
    match result {
        Ok(out) => {
            info!(owner_id = %owner_id, revoked = out.revoked, "api keys revoked");
            (
                StatusCode::OK,
                Json(RevokeApiKeysResponse {
                    revoked: out.revoked,
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!(owner_id = %owner_id, error = ?err, "api key revocation failed");
            storage_unavailable(trace_id)
        }
    }
}
