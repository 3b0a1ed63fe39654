use axum::body::Body;
use axum::body::to_bytes;
use axum::http::{Request, StatusCode};
use devprofiles_api::application::context::AppContext;
use devprofiles_api::config::Settings;
use devprofiles_api::domain::services::quota_enforcer::QuotaEnforcer;
use devprofiles_api::infrastructure::db::postgres::PostgresDatabase;
use devprofiles_api::infrastructure::db::repositories::Repositories;
use devprofiles_api::interface::http;
use devprofiles_api::interface::http::session::sign_session_id;
use devprofiles_api::interface::http::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

const SECRET: &str = "integration-secret";

fn test_db_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

async fn setup_state(daily_limit: u32) -> Option<(AppState, Arc<PostgresDatabase>)> {
    let url = test_db_url()?;
    let db = Arc::new(PostgresDatabase::connect(&url).await.ok()?);
    db.migrate().await.ok()?;
    let repos = Repositories::postgres(db.clone());
    let ctx = AppContext::new(repos, QuotaEnforcer::new(daily_limit), 3);
    let mut settings = Settings::default();
    settings.db.url = url;
    settings.session.secret = SECRET.to_string();
    settings.quota.daily_limit = daily_limit;
    let state = AppState {
        ctx: Arc::new(ctx),
        settings,
        metrics: None,
    };
    Some((state, db))
}

async fn login(db: &PostgresDatabase, owner_id: &str) -> String {
    let sid = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO session (sid, sess, expire) VALUES ($1, $2, NOW() + INTERVAL '1 hour')",
    )
    .bind(&sid)
    .bind(serde_json::json!({ "cookie": {}, "passport": { "user": owner_id } }))
    .execute(db.pool())
    .await
    .unwrap();
    format!("connect.sid={}", sign_session_id(&sid, SECRET).unwrap())
}

fn session_request(method: &str, uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("cookie", cookie)
        .body(Body::empty())
        .unwrap()
}

fn key_request(api_key: &str) -> Request<Body> {
    Request::builder()
        .uri("/public/projects")
        .header("x-api-key", api_key)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

async fn cleanup(db: &PostgresDatabase, owner_id: &str) {
    sqlx::query("DELETE FROM api_keys WHERE owner_id = $1")
        .bind(owner_id)
        .execute(db.pool())
        .await
        .unwrap();
}

#[tokio::test]
async fn given_session_when_issue_key_should_return_raw_key_once() {
    let Some((state, db)) = setup_state(100).await else {
        return;
    };
    let owner = format!("owner-{}", uuid::Uuid::new_v4());
    let cookie = login(&db, &owner).await;
    let app = http::app(state);

    let response = app
        .clone()
        .oneshot(session_request("POST", "/api/keys", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let issued = response_json(response).await;
    let api_key = issued["api_key"].as_str().unwrap().to_string();
    assert!(api_key.starts_with("dpk_"));
    assert_eq!(api_key.len(), 44);

    let response = app
        .oneshot(session_request("GET", "/api/keys", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let described = response_json(response).await;
    assert_eq!(described["key_prefix"], issued["key_prefix"]);
    assert!(described.get("api_key").is_none());

    cleanup(&db, &owner).await;
}

#[tokio::test]
async fn given_reissued_key_when_old_key_used_should_return_403() {
    let Some((state, db)) = setup_state(100).await else {
        return;
    };
    let owner = format!("owner-{}", uuid::Uuid::new_v4());
    let cookie = login(&db, &owner).await;
    let app = http::app(state);

    let first = response_json(
        app.clone()
            .oneshot(session_request("POST", "/api/keys", &cookie))
            .await
            .unwrap(),
    )
    .await;
    let second = response_json(
        app.clone()
            .oneshot(session_request("POST", "/api/keys", &cookie))
            .await
            .unwrap(),
    )
    .await;

    let old = app
        .clone()
        .oneshot(key_request(first["api_key"].as_str().unwrap()))
        .await
        .unwrap();
    let new = app
        .oneshot(key_request(second["api_key"].as_str().unwrap()))
        .await
        .unwrap();

    assert_eq!(old.status(), StatusCode::FORBIDDEN);
    assert_eq!(new.status(), StatusCode::OK);

    cleanup(&db, &owner).await;
}

#[tokio::test]
async fn given_limit_reached_when_key_used_should_return_429() {
    let Some((state, db)) = setup_state(3).await else {
        return;
    };
    let owner = format!("owner-{}", uuid::Uuid::new_v4());
    let cookie = login(&db, &owner).await;
    let app = http::app(state);
    let issued = response_json(
        app.clone()
            .oneshot(session_request("POST", "/api/keys", &cookie))
            .await
            .unwrap(),
    )
    .await;
    let api_key = issued["api_key"].as_str().unwrap().to_string();

    for remaining in ["2", "1", "0"] {
        let response = app.clone().oneshot(key_request(&api_key)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-ratelimit-remaining").unwrap(),
            remaining
        );
    }
    let response = app.oneshot(key_request(&api_key)).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    cleanup(&db, &owner).await;
}

#[tokio::test]
async fn given_revoked_keys_when_key_used_should_return_403() {
    let Some((state, db)) = setup_state(100).await else {
        return;
    };
    let owner = format!("owner-{}", uuid::Uuid::new_v4());
    let cookie = login(&db, &owner).await;
    let app = http::app(state);
    let issued = response_json(
        app.clone()
            .oneshot(session_request("POST", "/api/keys", &cookie))
            .await
            .unwrap(),
    )
    .await;

    let revoked = response_json(
        app.clone()
            .oneshot(session_request("DELETE", "/api/keys", &cookie))
            .await
            .unwrap(),
    )
    .await;
    let response = app
        .oneshot(key_request(issued["api_key"].as_str().unwrap()))
        .await
        .unwrap();

    assert_eq!(revoked["revoked"], 1);
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
