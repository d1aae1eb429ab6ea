/// API integration tests
/// Complete HTTP request/response cycles against a real SQLite database
mod common;

use axum::http::{header, StatusCode};
use common::{default_limits, send, send_json, signup, spawn_app, spawn_app_with};
use soundmark_server::config::LimitSettings;

fn entry_body(artist: &str, title: &str) -> serde_json::Value {
    serde_json::json!({ "artist": artist, "title": title })
}

#[tokio::test]
async fn test_health_is_public() {
    let test = spawn_app().await;

    let (status, body) = send_json(&test.app, "GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_library_requires_auth() {
    let test = spawn_app().await;

    let (status, _) = send_json(&test.app, "GET", "/api/library", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &test.app,
        "POST",
        "/api/library",
        None,
        Some(entry_body("Low", "Things We Lost in the Fire")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_then_login_flow() {
    let test = spawn_app().await;

    let (status, body) = send_json(
        &test.app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": "ana@example.com", "password": "listening123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["user"]["email"], "ana@example.com");

    // Fresh login with the same credentials
    let (status, body) = send_json(
        &test.app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": "ana@example.com", "password": "listening123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap();

    // The token opens protected routes
    let (status, body) = send_json(&test.app, "GET", "/api/library", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_signup_validation() {
    let test = spawn_app().await;

    // Short password
    let (status, _) = send_json(
        &test.app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": "ana@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Not an email
    let (status, _) = send_json(
        &test.app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": "not-an-email", "password": "listening123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Duplicate email
    signup(&test.app, "ana@example.com").await;
    let (status, body) = send_json(
        &test.app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": "ana@example.com", "password": "listening123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_signup_cap() {
    let test = spawn_app_with(
        LimitSettings {
            max_users: 1,
            ..default_limits()
        },
        None,
    )
    .await;

    signup(&test.app, "first@example.com").await;

    let (status, body) = send_json(
        &test.app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": "second@example.com", "password": "listening123" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Beta is full (1 user limit reached)");

    // The public limits route reports the same state
    let (status, body) = send_json(&test.app, "GET", "/api/limits/users", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["can_signup"], false);
    assert_eq!(body["current_count"], 1);
    assert_eq!(body["max_users"], 1);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let test = spawn_app().await;
    signup(&test.app, "ana@example.com").await;

    let (status, _) = send_json(
        &test.app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({ "email": "ana@example.com", "password": "wrongpassword" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let test = spawn_app().await;

    let (_, body) = send_json(
        &test.app,
        "POST",
        "/api/auth/signup",
        None,
        Some(serde_json::json!({ "email": "ana@example.com", "password": "listening123" })),
    )
    .await;
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    // A refresh token is not an access token
    let (status, _) =
        send_json(&test.app, "GET", "/api/library", Some(&refresh_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // But it buys a new access token
    let (status, body) = send_json(
        &test.app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(serde_json::json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let access = body["access_token"].as_str().unwrap();
    let (status, _) = send_json(&test.app, "GET", "/api/library", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_entry_crud_cycle() {
    let test = spawn_app().await;
    let token = signup(&test.app, "ana@example.com").await;

    // Create
    let (status, created) = send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&token),
        Some(serde_json::json!({
            "artist": "  Björk ",
            "title": "Homogenic",
            "genre": "Electronic",
            "release_year": 1997
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["artist"], "Björk");
    assert_eq!(created["status"], "Queued");
    let id = created["id"].as_str().unwrap().to_string();

    // Read back
    let (status, fetched) = send_json(
        &test.app,
        "GET",
        &format!("/api/library/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Homogenic");

    // Review update
    let (status, updated) = send_json(
        &test.app,
        "PUT",
        &format!("/api/library/{id}"),
        Some(&token),
        Some(serde_json::json!({
            "status": "Finished",
            "rating": 5,
            "influence_notes": "Strings over beats."
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Finished");
    assert_eq!(updated["rating"], 5);

    // Delete
    let (status, body) = send_json(
        &test.app,
        "DELETE",
        &format!("/api/library/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send_json(
        &test.app,
        "GET",
        &format!("/api/library/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_entry_validation() {
    let test = spawn_app().await;
    let token = signup(&test.app, "ana@example.com").await;

    let (status, _) = send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&token),
        Some(entry_body("   ", "Homogenic")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&token),
        Some(serde_json::json!({ "artist": "Björk", "title": "Homogenic", "rating": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Rating must be between 1 and 5");
}

#[tokio::test]
async fn test_album_cap_on_add() {
    let test = spawn_app_with(
        LimitSettings {
            max_albums_per_user: 1,
            ..default_limits()
        },
        None,
    )
    .await;
    let token = signup(&test.app, "ana@example.com").await;

    let (status, _) = send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&token),
        Some(entry_body("Björk", "Homogenic")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&token),
        Some(entry_body("Björk", "Post")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Album limit reached (1 max)");

    // Limits route agrees
    let (status, body) =
        send_json(&test.app, "GET", "/api/limits/albums", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["can_add"], false);
    assert_eq!(body["remaining"], 0);
}

#[tokio::test]
async fn test_entries_are_owner_scoped() {
    let test = spawn_app().await;
    let ana = signup(&test.app, "ana@example.com").await;
    let ben = signup(&test.app, "ben@example.com").await;

    let (_, created) = send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&ana),
        Some(entry_body("Low", "Double Negative")),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    // The other account cannot see or delete it
    let (status, _) = send_json(
        &test.app,
        "GET",
        &format!("/api/library/{id}"),
        Some(&ben),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &test.app,
        "DELETE",
        &format!("/api/library/{id}"),
        Some(&ben),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send_json(&test.app, "GET", "/api/library", Some(&ben), None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_list_filters_and_search() {
    let test = spawn_app().await;
    let token = signup(&test.app, "ana@example.com").await;

    for (artist, title, status) in [
        ("Björk", "Homogenic", "Finished"),
        ("Björk", "Post", "Queued"),
        ("Low", "Double Negative", "Listening"),
    ] {
        let (code, _) = send_json(
            &test.app,
            "POST",
            "/api/library",
            Some(&token),
            Some(serde_json::json!({ "artist": artist, "title": title, "status": status })),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
    }

    let (_, body) = send_json(
        &test.app,
        "GET",
        "/api/library?status=Queued",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["entries"][0]["title"], "Post");

    let (_, body) = send_json(
        &test.app,
        "GET",
        "/api/library?q=negative",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["entries"][0]["artist"], "Low");

    let (_, body) = send_json(
        &test.app,
        "GET",
        "/api/library?order=title",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["entries"][0]["title"], "Double Negative");

    let (status, _) = send_json(
        &test.app,
        "GET",
        "/api/library?status=Done",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &test.app,
        "GET",
        "/api/library?order=color",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_export_headers_and_content() {
    let test = spawn_app().await;
    let token = signup(&test.app, "ana@example.com").await;

    send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&token),
        Some(entry_body("Björk", "Homogenic")),
    )
    .await;

    let request = axum::http::Request::builder()
        .uri("/api/library/export")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::util::ServiceExt::oneshot(test.app.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("spreadsheetml"));
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("soundmark-export-"));
    assert!(disposition.ends_with(".xlsx\""));

    // The exported bytes decode back to the entry
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let rows = soundmark_sheet::read_import(&bytes).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].artist, "Björk");

    // Full export carries the -full suffix
    let (status, bytes) = send(
        &test.app,
        "GET",
        "/api/library/export?format=full",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!bytes.is_empty());

    let (status, _) = send(
        &test.app,
        "GET",
        "/api/library/export?format=csv",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lastfm_routes_without_client() {
    // No API key configured: the route answers with a config error, not a panic
    let test = spawn_app().await;
    let token = signup(&test.app, "ana@example.com").await;

    let (status, body) = send_json(
        &test.app,
        "GET",
        "/api/lastfm/search-artist?q=bjork",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Configuration error");
}
