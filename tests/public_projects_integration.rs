use axum::body::Body;
use axum::body::to_bytes;
use axum::http::{Request, StatusCode};
use devprofiles_api::application::context::AppContext;
use devprofiles_api::application::usecases::issue_api_key::{
    IssueApiKeyCommand, IssueApiKeyUseCase,
};
use devprofiles_api::config::Settings;
use devprofiles_api::domain::services::quota_enforcer::QuotaEnforcer;
use devprofiles_api::domain::value_objects::ids::OwnerId;
use devprofiles_api::infrastructure::db::postgres::PostgresDatabase;
use devprofiles_api::infrastructure::db::repositories::Repositories;
use devprofiles_api::interface::http;
use devprofiles_api::interface::http::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

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
    settings.public.max_limit = 2;
    let state = AppState {
        ctx: Arc::new(ctx),
        settings,
        metrics: None,
    };
    Some((state, db))
}

async fn issue_key(state: &AppState, owner: &str) -> String {
    IssueApiKeyUseCase::execute(
        &state.ctx,
        IssueApiKeyCommand {
            owner_id: OwnerId::new(owner),
        },
    )
    .await
    .unwrap()
    .api_key
}

async fn seed_project(db: &PostgresDatabase, owner: &str, title: &str, age_minutes: i32) {
    sqlx::query(
        "INSERT INTO projects (id, owner_id, title, description, created_at)
        VALUES ($1, $2, $3, '', NOW() - make_interval(mins => $4))",
    )
    .bind(uuid::Uuid::new_v4())
    .bind(owner)
    .bind(title)
    .bind(age_minutes)
    .execute(db.pool())
    .await
    .unwrap();
}

fn key_request(uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", api_key)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

async fn cleanup(db: &PostgresDatabase, owner: &str) {
    for table in ["api_keys", "projects"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE owner_id = $1"))
            .bind(owner)
            .execute(db.pool())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn given_projects_when_listing_should_return_newest_first_capped_at_max() {
    let Some((state, db)) = setup_state(100).await else {
        return;
    };
    let owner = format!("owner-{}", uuid::Uuid::new_v4());
    seed_project(&db, &owner, "oldest", 30).await;
    seed_project(&db, &owner, "middle", 20).await;
    seed_project(&db, &owner, "newest", 10).await;
    let key = issue_key(&state, &owner).await;

    let response = http::app(state)
        .oneshot(key_request("/public/projects?limit=25", &key))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["type"], true);
    let titles: Vec<&str> = json["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["newest", "middle"]);

    cleanup(&db, &owner).await;
}

#[tokio::test]
async fn given_concurrent_requests_when_quota_small_should_never_admit_past_limit() {
    let Some((state, db)) = setup_state(5).await else {
        return;
    };
    let owner = format!("owner-{}", uuid::Uuid::new_v4());
    let key = issue_key(&state, &owner).await;
    let app = http::app(state);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let app = app.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            app.oneshot(key_request("/public/projects", &key))
                .await
                .unwrap()
                .status()
        }));
    }
    let mut admitted = 0;
    for handle in handles {
        let status = handle.await.unwrap();
        assert!(matches!(
            status,
            StatusCode::OK | StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
        ));
        if status == StatusCode::OK {
            admitted += 1;
        }
    }

    let stored: i32 = sqlx::query_scalar("SELECT requests_today FROM api_keys WHERE owner_id = $1")
        .bind(&owner)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert!(admitted <= 5);
    assert_eq!(stored, admitted);

    cleanup(&db, &owner).await;
}
