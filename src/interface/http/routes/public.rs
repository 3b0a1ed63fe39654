// HTTP routes: project listing for API-key callers.

use crate::application::usecases::list_projects::{
    ListProjectsCommand, ListProjectsError, ListProjectsUseCase,
};
use crate::config::Public;
use crate::interface::http::auth::ApiPrincipal;
use crate::interface::http::dto::projects::{ProjectResponse, ProjectsQuery, ProjectsResponse};
use crate::interface::http::problem::{RFA_REQUEST_MALFORMED, RFA_STORAGE_DB_ERROR, problem};
use crate::interface::http::state::AppState;
use crate::interface::http::trace::TraceId;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use tracing::error;

const PROJECTS_PATH: &str = "/public/projects";

/// Builds the public routes. Expects the API-key middleware in front.
pub fn router() -> Router<AppState> {
    Router::new().route(PROJECTS_PATH, get(list_projects))
}

/// Page size from the raw query value: default when absent, capped at the maximum.
/// Anything but a positive integer is rejected.
fn parse_limit(raw: Option<&str>, settings: &Public) -> Option<u32> {
    let Some(raw) = raw else {
        return Some(settings.default_limit.min(settings.max_limit));
    };
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(limit) => Some(limit.min(settings.max_limit)),
    }
}

async fn list_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<ApiPrincipal>,
    Extension(trace_id): Extension<TraceId>,
    Query(query): Query<ProjectsQuery>,
) -> Response {
    let trace_id = Some(trace_id.0);
    let malformed = |trace_id| {
        problem(
            StatusCode::BAD_REQUEST,
            RFA_REQUEST_MALFORMED,
            Some("limit must be a positive integer".to_string()),
            Some(PROJECTS_PATH.to_string()),
            trace_id,
        )
    };

    // Step 1: validate the page size.
    let Some(limit) = parse_limit(query.limit.as_deref(), &state.settings.public) else {
        return malformed(trace_id);
    };

    // Step 2: list on behalf of the key's owner.
    let result = ListProjectsUseCase::execute(
        &state.ctx,
        ListProjectsCommand {
            owner_id: principal.owner_id.clone(),
            limit,
        },
    )
    .await;
    match result {
        Ok(projects) => (
            StatusCode::OK,
            Json(ProjectsResponse {
                ok: true,
                projects: projects.into_iter().map(ProjectResponse::from).collect(),
            }),
        )
            .into_response(),
        Err(ListProjectsError::InvalidLimit) => malformed(trace_id),
        Err(ListProjectsError::Storage(err)) => {
            error!(owner_id = %principal.owner_id, error = %err, "project listing failed");
            problem(
                StatusCode::SERVICE_UNAVAILABLE,
                RFA_STORAGE_DB_ERROR,
                Some("storage unavailable".to_string()),
                Some(PROJECTS_PATH.to_string()),
                trace_id,
            )
        }
    }
}
