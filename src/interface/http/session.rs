use crate::domain::value_objects::ids::OwnerId;
use crate::interface::http::problem::{RFA_AUTH_INVALID_CREDENTIALS, RFA_STORAGE_DB_ERROR, problem};
use crate::interface::http::state::AppState;
use crate::interface::http::trace::TraceId;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, error};

type HmacSha256 = Hmac<Sha256>;

const SIGNED_PREFIX: &str = "s:";

/// Owner logged in on the request's session.
#[derive(Debug, Clone)]
pub struct SessionOwner(pub OwnerId);

/// Value of cookie `name` from the `Cookie` headers, if present.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim())
}

/// Signs a session id the way the login front does: `s:<sid>.<base64 hmac>`, URL-encoded.
/// An empty secret signs nothing.
pub fn sign_session_id(sid: &str, secret: &str) -> Option<String> {
    if secret.is_empty() {
        return None;
    }
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(sid.as_bytes());
    let signature = STANDARD_NO_PAD.encode(mac.finalize().into_bytes());
    Some(urlencoding::encode(&format!("{SIGNED_PREFIX}{sid}.{signature}")).into_owned())
}

/// Returns the session id of a signed cookie value, or `None` when the value is not
/// signed or the signature does not match `secret`. An empty secret verifies nothing.
pub fn unsign_session_cookie(value: &str, secret: &str) -> Option<String> {
    if secret.is_empty() {
        return None;
    }

    // Step 1: Undo URL encoding and require the signed form.
    let decoded = urlencoding::decode(value).ok()?;
    let signed = decoded.strip_prefix(SIGNED_PREFIX)?;

    // Step 2: Split the session id from its signature.
    let (sid, signature) = signed.rsplit_once('.')?;
    if sid.is_empty() {
        return None;
    }
    let signature = STANDARD_NO_PAD.decode(signature).ok()?;

    // Step 3: Verify in constant time.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(sid.as_bytes());
    mac.verify_slice(&signature).ok()?;
    Some(sid.to_string())
}

/// Requires a live login session and binds its owner to the request.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let trace_id = req.extensions().get::<TraceId>().map(|t| t.0.clone());
    let path = req.uri().path().to_string();
    let unauthenticated = |detail: &str, trace_id: Option<String>, path: String| {
        problem(
            StatusCode::UNAUTHORIZED,
            RFA_AUTH_INVALID_CREDENTIALS,
            Some(detail.to_string()),
            Some(path),
            trace_id,
        )
    };

    // Step 1: Read and verify the signed cookie.
    let settings = &state.settings.session;
    let Some(raw) = cookie_value(req.headers(), &settings.cookie_name) else {
        return Err(unauthenticated("login required", trace_id, path));
    };
    let Some(sid) = unsign_session_cookie(raw, &settings.secret) else {
        debug!(path = %path, "session cookie signature mismatch");
        return Err(unauthenticated("invalid session", trace_id, path));
    };

    // Step 2: Load the owner from the session store.
    let owner = match state.ctx.repos.session.owner_for_session(&sid).await {
        Ok(owner) => owner,
        Err(err) => {
            error!(error = ?err, "session lookup failed");
            return Err(problem(
                StatusCode::SERVICE_UNAVAILABLE,
                RFA_STORAGE_DB_ERROR,
                Some("storage unavailable".to_string()),
                Some(path),
                trace_id,
            ));
        }
    };
    let Some(owner_id) = owner else {
        return Err(unauthenticated("session expired", trace_id, path));
    };

    req.extensions_mut().insert(SessionOwner(owner_id));
    Ok(next.run(req).await)
}
