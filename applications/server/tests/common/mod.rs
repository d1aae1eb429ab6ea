/// Common test utilities and fixtures
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use soundmark_lastfm::LastfmClient;
use soundmark_server::{config::LimitSettings, create_app, AppState, AuthService};
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    _dir: TempDir,
}

pub fn default_limits() -> LimitSettings {
    LimitSettings {
        max_albums_per_user: 500,
        max_users: 50,
    }
}

/// App over a fresh SQLite file, no Last.fm client
pub async fn spawn_app() -> TestApp {
    spawn_app_with(default_limits(), None).await
}

pub async fn spawn_app_with(limits: LimitSettings, lastfm_base_url: Option<String>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let pool = soundmark_storage::create_pool(&format!("sqlite://{}", db_path.display()))
        .await
        .unwrap();
    soundmark_storage::run_migrations(&pool).await.unwrap();

    let auth_service = Arc::new(AuthService::new(
        "test-secret-key".to_string(),
        1, // 1 hour access
        1, // 1 day refresh
    ));

    let lastfm = lastfm_base_url
        .map(|url| Arc::new(LastfmClient::with_base_url("test-api-key", url).unwrap()));

    let app_state = AppState::new(pool.clone(), Arc::clone(&auth_service), lastfm, limits);

    TestApp {
        app: create_app(app_state),
        pool,
        auth_service,
        _dir: dir,
    }
}

/// One request through the router, returning status and raw body
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Like `send`, parsing the body as JSON
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = send(app, method, uri, token, body).await;
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Sign up a fresh account and return its access token
pub async fn signup(app: &Router, email: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": email, "password": "listening123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}
