//! Contract tests for the endpoint wrappers.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET | `/search` | `test_search_*` |
//! | GET | `/me/following` | `test_followed_artists_*` |
//! | GET | `/artists/{id}/albums` | `test_artist_albums_*` |
//! | POST | `/users/{id}/playlists` | `test_create_playlist_*` |
//! | POST | `/playlists/{id}/tracks` | `test_add_tracks_*` |
//! | PUT | `/me/player` | `test_transfer_playback_*` |

use reqwest::StatusCode;
use serde_json::json;
use sporlapi::{
    config::ClientConfig,
    spotify::{Client, Pageable},
    types::{SearchType, Track},
};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> Client {
    Client::new(
        reqwest::Client::new(),
        ClientConfig::default()
            .with_base_url(server.uri())
            .with_auto_retry(true),
    )
}

// ── GET /search ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_encodes_query_and_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "artist:tove lo"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {
                "href": format!("{}/search?q=artist%3Atove+lo&type=track&limit=1", server.uri()),
                "limit": 1,
                "offset": 0,
                "total": 120,
                "next": format!("{}/search?q=artist%3Atove+lo&type=track&limit=1&offset=1", server.uri()),
                "previous": null,
                "items": [{
                    "id": "1",
                    "name": "Habits (Stay High)",
                    "uri": "spotify:track:1",
                    "duration_ms": 209160,
                    "artists": [{ "id": "a", "name": "Tove Lo" }]
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .search::<Track>(
            &CancellationToken::new(),
            "artist:tove lo",
            SearchType::Track,
            1,
        )
        .await
        .unwrap();

    assert_eq!(page.total, 120);
    assert!(page.has_next());
    assert_eq!(page.items[0].name, "Habits (Stay High)");
    assert_eq!(page.items[0].artists[0].name, "Tove Lo");
}

// ── GET /me/following ────────────────────────────────────────────────

#[tokio::test]
async fn test_followed_artists_returns_cursor_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/following"))
        .and(query_param("type", "artist"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": {
                "href": format!("{}/me/following?type=artist&limit=2", server.uri()),
                "limit": 2,
                "total": 3,
                "next": format!("{}/me/following?type=artist&after=b&limit=2", server.uri()),
                "cursors": { "after": "b" },
                "items": [
                    { "id": "a", "name": "Robyn", "genres": ["dance pop"], "uri": "spotify:artist:a" },
                    { "id": "b", "name": "Lykke Li", "genres": [], "uri": "spotify:artist:b" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .followed_artists(&CancellationToken::new(), 2)
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.cursors.after.as_deref(), Some("b"));
    let names: Vec<&str> = page.items.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Robyn", "Lykke Li"]);
}

// ── GET /artists/{id}/albums ─────────────────────────────────────────

#[tokio::test]
async fn test_artist_albums_returns_offset_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artists/0oSGxfWSnnOXhD2fKuz2Gy/albums"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "href": format!("{}/artists/0oSGxfWSnnOXhD2fKuz2Gy/albums?limit=5", server.uri()),
            "limit": 5,
            "offset": 0,
            "total": 1,
            "next": null,
            "previous": null,
            "items": [{
                "id": "x",
                "name": "Heroes",
                "album_type": "album",
                "release_date": "1977-10-14",
                "total_tracks": 10,
                "artists": [{ "id": "0oSGxfWSnnOXhD2fKuz2Gy", "name": "David Bowie" }],
                "uri": "spotify:album:x"
            }]
        })))
        .mount(&server)
        .await;

    let page = client(&server)
        .artist_albums(&CancellationToken::new(), "0oSGxfWSnnOXhD2fKuz2Gy", 5)
        .await
        .unwrap();

    assert!(!page.has_next());
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].release_date, "1977-10-14");
}

#[tokio::test]
async fn test_artist_albums_reports_unknown_artist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artists/nope/albums"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({ "error": { "status": 400, "message": "invalid id" } }),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .artist_albums(&CancellationToken::new(), "nope", 5)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid id (HTTP 400)");
}

// ── POST /users/{id}/playlists ───────────────────────────────────────

#[tokio::test]
async fn test_create_playlist_accepts_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/listener/playlists"))
        .and(body_json(json!({
            "name": "Weekly Picks",
            "public": false,
            "collaborative": false,
            "description": "fresh"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pl1",
            "name": "Weekly Picks",
            "description": "fresh",
            "public": false,
            "collaborative": false,
            "snapshot_id": "s1",
            "uri": "spotify:playlist:pl1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let playlist = client(&server)
        .create_playlist(
            &CancellationToken::new(),
            "listener",
            "Weekly Picks",
            false,
            Some("fresh"),
        )
        .await
        .unwrap();

    assert_eq!(playlist.id, "pl1");
    assert_eq!(playlist.snapshot_id, "s1");
    assert_eq!(playlist.public, Some(false));
}

#[tokio::test]
async fn test_create_playlist_keeps_reserved_characters_inside_the_user_segment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/a%2Fb%3Fc/playlists"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "pl2",
            "name": "Odd Owner",
            "snapshot_id": "s1",
            "uri": "spotify:playlist:pl2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let playlist = client(&server)
        .create_playlist(&CancellationToken::new(), "a/b?c", "Odd Owner", true, None)
        .await
        .unwrap();
    assert_eq!(playlist.id, "pl2");
}

// ── POST /playlists/{id}/tracks ──────────────────────────────────────

#[tokio::test]
async fn test_add_tracks_returns_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:1", "spotify:track:2"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s2" })))
        .expect(1)
        .mount(&server)
        .await;

    let uris = vec!["spotify:track:1".to_string(), "spotify:track:2".to_string()];
    let snapshot = client(&server)
        .add_tracks_to_playlist(&CancellationToken::new(), "pl1", &uris)
        .await
        .unwrap();
    assert_eq!(snapshot.snapshot_id, "s2");
}

#[tokio::test]
async fn test_add_tracks_waits_out_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlists/pl1/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:1"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s3" })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client(&server)
        .add_tracks_to_playlist(
            &CancellationToken::new(),
            "pl1",
            &["spotify:track:1".to_string()],
        )
        .await
        .unwrap();
    assert_eq!(snapshot.snapshot_id, "s3");
}

// ── PUT /me/player ───────────────────────────────────────────────────

#[tokio::test]
async fn test_transfer_playback_treats_accepted_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/me/player"))
        .and(body_json(json!({ "device_ids": ["dev1"], "play": true })))
        .respond_with(ResponseTemplate::new(202).insert_header("Retry-After", "0"))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .transfer_playback(&CancellationToken::new(), "dev1", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_transfer_playback_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/me/player"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .transfer_playback(&CancellationToken::new(), "dev1", false)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_transfer_playback_reports_missing_device() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/me/player"))
        .respond_with(ResponseTemplate::new(404).set_body_json(
            json!({ "error": { "status": 404, "message": "Device not found" } }),
        ))
        .mount(&server)
        .await;

    let err = client(&server)
        .transfer_playback(&CancellationToken::new(), "gone", true)
        .await
        .unwrap_err();
    let service = err.as_service().expect("service error");
    assert_eq!(service.status(), StatusCode::NOT_FOUND);
    assert_eq!(service.message(), "Device not found");
}
