use crate::application::shared::api_key_types::ApiKeyUseCaseError;
use crate::application::usecases::consume_quota::{
    ConsumeQuotaCommand, ConsumeQuotaUseCase, QuotaError,
};
use crate::application::usecases::resolve_api_key::ResolveApiKeyUseCase;
use crate::domain::value_objects::ids::OwnerId;
use crate::domain::value_objects::timestamps::today_utc;
use crate::interface::http::problem::{
    RFA_AUTH_FORBIDDEN, RFA_AUTH_INVALID_CREDENTIALS, RFA_QUOTA_CONTENDED, RFA_QUOTA_EXCEEDED,
    RFA_STORAGE_DB_ERROR, problem,
};
use crate::interface::http::state::AppState;
use crate::interface::http::trace::{QuotaStatus, TraceId};
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, error, warn};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const RATE_LIMIT_LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Owner whose key was admitted by the quota gate; handlers act on their behalf.
#[derive(Debug, Clone)]
pub struct ApiPrincipal {
    pub owner_id: OwnerId,
}

fn insert_quota_headers(headers: &mut HeaderMap, status: QuotaStatus) {
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_LIMIT_HEADER),
        HeaderValue::from(status.limit),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_REMAINING_HEADER),
        HeaderValue::from(status.remaining),
    );
}

/// Resolves the `x-api-key` header, charges one request against the key's daily
/// quota and binds the key's owner to the request.
///
/// Missing key is 401, unknown key 403, exhausted quota 429. Storage failures and
/// unresolved contention fail closed with 503.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let trace_id = req.extensions().get::<TraceId>().map(|t| t.0.clone());
    let path = req.uri().path().to_string();

    // Step 1: Extract the raw key.
    let raw = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or("");
    if raw.is_empty() {
        debug!(path = %path, "request without api key");
        return Err(problem(
            StatusCode::UNAUTHORIZED,
            RFA_AUTH_INVALID_CREDENTIALS,
            Some("api key required".to_string()),
            Some(path),
            trace_id,
        ));
    }

    // Step 2: Resolve the key to its record.
    let record = match ResolveApiKeyUseCase::execute(&state.ctx, raw).await {
        Ok(record) => record,
        Err(ApiKeyUseCaseError::NotFound) => {
            debug!(path = %path, "unknown api key");
            return Err(problem(
                StatusCode::FORBIDDEN,
                RFA_AUTH_FORBIDDEN,
                Some("invalid api key".to_string()),
                Some(path),
                trace_id,
            ));
        }
        Err(ApiKeyUseCaseError::Storage(err)) => {
            error!(path = %path, error = %err, "api key lookup failed");
            return Err(storage_unavailable(path, trace_id));
        }
    };

    // Step 3: Charge the request against today's quota.
    let key_prefix = record.key_prefix.clone();
    let outcome = ConsumeQuotaUseCase::execute(
        &state.ctx,
        ConsumeQuotaCommand {
            record,
            today: today_utc(),
        },
    )
    .await;
    let outcome = match outcome {
        Ok(outcome) => outcome,
        // Revoked between lookup and charge.
        Err(QuotaError::NotFound) => {
            return Err(problem(
                StatusCode::FORBIDDEN,
                RFA_AUTH_FORBIDDEN,
                Some("invalid api key".to_string()),
                Some(path),
                trace_id,
            ));
        }
        Err(QuotaError::Contended) => {
            warn!(key_prefix = %key_prefix, "quota update contended; request refused");
            return Err(problem(
                StatusCode::SERVICE_UNAVAILABLE,
                RFA_QUOTA_CONTENDED,
                Some("quota could not be updated, retry later".to_string()),
                Some(path),
                trace_id,
            ));
        }
        Err(QuotaError::Storage(err)) => {
            error!(key_prefix = %key_prefix, error = %err, "quota update failed");
            return Err(storage_unavailable(path, trace_id));
        }
    };
    let status = QuotaStatus {
        limit: outcome.limit,
        remaining: outcome.remaining,
    };

    // Step 4: Reject without invoking the handler once the quota is spent.
    if !outcome.decision.is_admitted() {
        debug!(key_prefix = %key_prefix, "daily quota exhausted");
        let mut response = problem(
            StatusCode::TOO_MANY_REQUESTS,
            RFA_QUOTA_EXCEEDED,
            Some("limit exceeded".to_string()),
            Some(path),
            trace_id,
        );
        insert_quota_headers(response.headers_mut(), status);
        response.extensions_mut().insert(status);
        return Err(response);
    }

    // Step 5: Bind the owner and forward.
    let owner_id = outcome.decision.into_record().owner_id;
    req.extensions_mut().insert(ApiPrincipal { owner_id });
    let mut response = next.run(req).await;
    insert_quota_headers(response.headers_mut(), status);
    response.extensions_mut().insert(status);
    Ok(response)
}

fn storage_unavailable(path: String, trace_id: Option<String>) -> Response {
    problem(
        StatusCode::SERVICE_UNAVAILABLE,
        RFA_STORAGE_DB_ERROR,
        Some("storage unavailable".to_string()),
        Some(path),
        trace_id,
    )
}
