pub mod auth;
pub mod dto;
pub mod problem;
pub mod routes;
pub mod session;
pub mod state;
pub mod trace;

use crate::config::Cors;
use crate::interface::http::state::AppState;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Credentialed CORS for the owner dashboard, limited to the configured origin.
fn owner_cors(settings: &Cors) -> CorsLayer {
    // A wildcard cannot be combined with credentials.
    let origin = settings
        .allowed_origin
        .parse::<HeaderValue>()
        .ok()
        .filter(|v| *v != "*");
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origin))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// API-key callers come from any origin and never send cookies.
fn public_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET])
        .allow_headers([header::HeaderName::from_static(auth::API_KEY_HEADER)])
        .expose_headers([
            header::HeaderName::from_static(auth::RATE_LIMIT_LIMIT_HEADER),
            header::HeaderName::from_static(auth::RATE_LIMIT_REMAINING_HEADER),
        ])
}

/// Builds the full HTTP application.
pub fn app(state: AppState) -> Router {
    // Step 1: Routes behind the login session.
    let owner = Router::new()
        .merge(routes::api_key::router())
        .merge(routes::account::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ))
        .layer(owner_cors(&state.settings.cors));

    // Step 2: Routes behind an API key and its daily quota.
    let public = Router::new()
        .merge(routes::public::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::api_key_middleware,
        ))
        .layer(public_cors());

    // Step 3: Operational routes, then the shared trace and log layers.
    Router::new()
        .merge(routes::health::router())
        .merge(routes::ready::router())
        .merge(routes::metrics::router())
        .merge(owner)
        .merge(public)
        .layer(middleware::from_fn(trace::request_log_middleware))
        .layer(middleware::from_fn(trace::trace_id_middleware))
        .with_state(state)
}
