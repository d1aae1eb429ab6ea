/// Last.fm proxy and merge endpoint tests against a mock upstream
mod common;

use axum::http::StatusCode;
use common::{default_limits, send_json, signup, spawn_app_with};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_with_mock() -> (MockServer, common::TestApp) {
    let mock_server = MockServer::start().await;
    let base_url = format!("{}/2.0/", mock_server.uri());
    let test = spawn_app_with(default_limits(), Some(base_url)).await;
    (mock_server, test)
}

fn album_info_body() -> serde_json::Value {
    serde_json::json!({
        "album": {
            "name": "Homogenic",
            "artist": "Björk",
            "url": "https://www.last.fm/music/Bj%C3%B6rk/Homogenic",
            "listeners": "651234",
            "playcount": 14_220_901,
            "image": [
                {"#text": "https://img.example/hom-m.png", "size": "medium"},
                {"#text": "https://img.example/hom-xl.png", "size": "extralarge"}
            ],
            "tracks": {
                "track": [
                    {"name": "Hunter", "duration": "255"},
                    {"name": "Jóga", "duration": 305}
                ]
            },
            "tags": {
                "tag": [
                    {"name": "electronic", "url": "https://www.last.fm/tag/electronic"},
                    {"name": "art pop", "url": "https://www.last.fm/tag/art+pop"}
                ]
            },
            "wiki": {
                "summary": "Homogenic was released on 22 September 1997."
            }
        }
    })
}

fn artist_info_body() -> serde_json::Value {
    serde_json::json!({
        "artist": {
            "name": "Björk",
            "similar": {
                "artist": [
                    {"name": "Portishead", "url": "https://www.last.fm/music/Portishead"}
                ]
            }
        }
    })
}

#[tokio::test]
async fn test_search_artist_proxy() {
    let (mock_server, test) = spawn_with_mock().await;
    let token = signup(&test.app, "ana@example.com").await;

    Mock::given(method("GET"))
        .and(path("/2.0/"))
        .and(query_param("method", "artist.search"))
        .and(query_param("artist", "bjork"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": {
                "artistmatches": {
                    "artist": [{
                        "name": "Björk",
                        "listeners": "2104329",
                        "url": "https://www.last.fm/music/Bj%C3%B6rk",
                        "image": [{"#text": "https://img.example/xl.png", "size": "extralarge"}]
                    }]
                }
            }
        })))
        .mount(&mock_server)
        .await;

    let (status, body) = send_json(
        &test.app,
        "GET",
        "/api/lastfm/search-artist?q=bjork",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Björk");
    assert_eq!(body[0]["listeners"], 2_104_329);
}

#[tokio::test]
async fn test_search_requires_query() {
    let (_mock_server, test) = spawn_with_mock().await;
    let token = signup(&test.app, "ana@example.com").await;

    for uri in [
        "/api/lastfm/search-artist",
        "/api/lastfm/search-artist?q=",
        "/api/lastfm/search-album?q=%20",
        "/api/lastfm/artist-albums",
    ] {
        let (status, _) = send_json(&test.app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expected 400 for {uri}");
    }
}

#[tokio::test]
async fn test_search_upstream_failure_is_bad_gateway() {
    let (mock_server, test) = spawn_with_mock().await;
    let token = signup(&test.app, "ana@example.com").await;

    Mock::given(method("GET"))
        .and(path("/2.0/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let (status, body) = send_json(
        &test.app,
        "GET",
        "/api/lastfm/search-album?q=homogenic",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Last.fm request failed");
}

#[tokio::test]
async fn test_album_info_not_found_maps_to_404() {
    let (mock_server, test) = spawn_with_mock().await;
    let token = signup(&test.app, "ana@example.com").await;

    // Last.fm answers errors as a 200 with an error payload
    Mock::given(method("GET"))
        .and(path("/2.0/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": 6,
            "message": "Album not found"
        })))
        .mount(&mock_server)
        .await;

    let (status, body) = send_json(
        &test.app,
        "GET",
        "/api/lastfm/album-info?artist=Nobody&album=Nothing",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No album data found");
}

#[tokio::test]
async fn test_merge_preview_and_apply() {
    let (mock_server, test) = spawn_with_mock().await;
    let token = signup(&test.app, "ana@example.com").await;

    // An entry with genre already set by hand
    let (_, created) = send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&token),
        Some(serde_json::json!({
            "artist": "Björk",
            "title": "Homogenic",
            "genre": "Trip Hop"
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    Mock::given(method("GET"))
        .and(path("/2.0/"))
        .and(query_param("method", "album.getinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(album_info_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2.0/"))
        .and(query_param("method", "artist.getinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(artist_info_body()))
        .mount(&mock_server)
        .await;

    // Preview: populated genre is not proposed, empty fields are
    let (status, preview) = send_json(
        &test.app,
        "GET",
        &format!("/api/library/{id}/merge/preview"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["metadata"]["genre"], "electronic");
    let preselected: Vec<String> = preview["preselected"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert!(!preselected.contains(&"genre".to_string()));
    assert!(preselected.contains(&"cover".to_string()));
    assert!(preselected.contains(&"year".to_string()));
    assert!(preselected.contains(&"tracks".to_string()));

    // Apply with a forced genre on top of the preselection
    let mut fields = preselected;
    fields.push("genre".to_string());
    let (status, entry) = send_json(
        &test.app,
        "POST",
        &format!("/api/library/{id}/merge"),
        Some(&token),
        Some(serde_json::json!({
            "metadata": preview["metadata"],
            "fields": fields
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["genre"], "electronic");
    assert_eq!(entry["release_year"], 1997);
    assert_eq!(
        entry["cover_image_url"],
        "https://img.example/hom-xl.png"
    );
    assert_eq!(entry["tracks"].as_array().unwrap().len(), 2);
    assert_eq!(entry["similar_artists"][0]["name"], "Portishead");
    // Untouched fields survive
    assert_eq!(entry["artist"], "Björk");
    assert_eq!(entry["status"], "Queued");
}

#[tokio::test]
async fn test_merge_apply_rejects_unknown_field() {
    let (_mock_server, test) = spawn_with_mock().await;
    let token = signup(&test.app, "ana@example.com").await;

    let (_, created) = send_json(
        &test.app,
        "POST",
        "/api/library",
        Some(&token),
        Some(serde_json::json!({ "artist": "Björk", "title": "Post" })),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send_json(
        &test.app,
        "POST",
        &format!("/api/library/{id}/merge"),
        Some(&token),
        Some(serde_json::json!({
            "metadata": { "title": "Post", "artist": "Björk" },
            "fields": ["rating"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown merge field: rating");
}

#[tokio::test]
async fn test_merge_preview_missing_entry() {
    let (_mock_server, test) = spawn_with_mock().await;
    let token = signup(&test.app, "ana@example.com").await;

    let (status, _) = send_json(
        &test.app,
        "GET",
        "/api/library/no-such-id/merge/preview",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
