// HTTP routes: account removal.

use crate::application::usecases::delete_account::{DeleteAccountCommand, DeleteAccountUseCase};
use crate::interface::http::dto::api_keys::DeleteAccountResponse;
use crate::interface::http::problem::{RFA_STORAGE_DB_ERROR, problem};
use crate::interface::http::session::SessionOwner;
use crate::interface::http::state::AppState;
use crate::interface::http::trace::TraceId;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::delete};
use tracing::{error, info};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/account", delete(delete_account))
}

async fn delete_account(
    State(state): State<AppState>,
    Extension(SessionOwner(owner_id)): Extension<SessionOwner>,
    Extension(trace_id): Extension<TraceId>,
) -> Response {
    let result = DeleteAccountUseCase::execute(
        &state.ctx,
        DeleteAccountCommand {
            owner_id: owner_id.clone(),
        },
    )
    .await;
    match result {
        Ok(out) => {
            info!(
                owner_id = %owner_id,
                revoked_keys = out.revoked_keys,
                deleted_projects = out.deleted_projects,
                "account data deleted"
            );
            (
                StatusCode::OK,
                Json(DeleteAccountResponse {
                    success: true,
                    revoked_keys: out.revoked_keys,
                    deleted_projects: out.deleted_projects,
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!(owner_id = %owner_id, error = ?err, "account deletion failed");
            problem(
                StatusCode::SERVICE_UNAVAILABLE,
                RFA_STORAGE_DB_ERROR,
                Some("storage unavailable".to_string()),
                Some("/api/account".to_string()),
                Some(trace_id.0),
            )
        }
    }
}
