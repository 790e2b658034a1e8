use crate::{test_app, test_app_with_token_url};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use libtour::location::{FeatureCollection, Location};
use serde_json::{Value, json};
use sqlx::{Pool, Sqlite};
use test_log::test;
use tower::Service;

/// a small feed in its raw, pre-normalization shape
fn sample_locations() -> Vec<Location> {
    let doc = json!({
        "type": "FeatureCollection",
        "features": [
            { "geometry": { "coordinates": [127.68, 26.21] },
              "properties": { "id": "loc-1", "title": "Shuri Castle",
                              "description": "Ryukyu royal palace",
                              "address": "1-2 Shurikinjocho, Naha",
                              "category": "1", "pin_id": "pin-1" } },
            { "geometry": { "coordinates": [127.87, 26.69] },
              "properties": { "id": "loc-2", "title": "Churaumi Aquarium",
                              "description": "Whale shark tank",
                              "address": "424 Ishikawa, Motobu",
                              "original_data": { "category": "2" },
                              "pin_id": "pin-2" } },
            { "geometry": { "coordinates": [127.66, 26.19] },
              "properties": { "id": "loc-3", "title": "Naha Beach Hotel",
                              "category": 3 } },
        ],
    });
    let fc: FeatureCollection = serde_json::from_value(doc).expect("failed to parse feed");
    fc.normalize_all()
}

async fn get_json(app: &mut axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app
        .as_service()
        .call(request)
        .await
        .expect("Failed to execute request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };
    (status, body)
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn list_locations(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, sample_locations())
        .await
        .expect("failed to create test app");

    let (status, body) = get_json(&mut app, "/api/v1/location/list").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().expect("expected a json array");
    assert_eq!(list.len(), 3);
    // the aquarium's category came from original_data
    assert_eq!(list[1]["category_id"], "2");
    assert_eq!(list[1]["category"], "Activity");
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn filter_locations_by_category(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, sample_locations())
        .await
        .expect("failed to create test app");

    let (status, body) = get_json(&mut app, "/api/v1/location/list?categories=2,3").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().expect("expected a json array");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], "loc-2");
    assert_eq!(list[1]["id"], "loc-3");

    // an empty filter string means no filter
    let (status, body) = get_json(&mut app, "/api/v1/location/list?categories=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("expected a json array").len(), 3);
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn search_locations(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, sample_locations())
        .await
        .expect("failed to create test app");

    let (status, body) = get_json(&mut app, "/api/v1/location/list?q=aquarium").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().expect("expected a json array");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], "loc-2");

    // search and category filter combine
    let (status, body) = get_json(&mut app, "/api/v1/location/list?q=naha&categories=3").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().expect("expected a json array");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], "loc-3");
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn show_location(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, sample_locations())
        .await
        .expect("failed to create test app");

    let (status, body) = get_json(&mut app, "/api/v1/location/loc-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Shuri Castle");
    assert_eq!(body["pin_id"], "pin-1");

    let (status, _) = get_json(&mut app, "/api/v1/location/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn refresh_keeps_cache_when_feed_is_down(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, sample_locations())
        .await
        .expect("failed to create test app");

    // the test feed url points at a closed port, so the refresh fails and the
    // cache keeps its previous contents
    let request = Request::builder()
        .uri("/api/v1/location/refresh")
        .method("POST")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app
        .as_service()
        .call(request)
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("expected json body");
    assert_eq!(body["count"], 3);
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn list_categories(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, Vec::new())
        .await
        .expect("failed to create test app");

    let (status, body) = get_json(&mut app, "/api/v1/category/list").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().expect("expected a json array");
    assert_eq!(list.len(), 7);
    assert_eq!(list[0]["id"], "1");
    assert_eq!(list[0]["name"], "Tourist Attractions");
    // the airport keeps its legacy id
    assert_eq!(list[6]["id"], "9");
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn protected_routes_require_login(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, Vec::new())
        .await
        .expect("failed to create test app");

    for uri in [
        "/api/v1/favorite/list",
        "/api/v1/travellog/list",
        "/api/v1/settings",
    ] {
        let (status, _) = get_json(&mut app, uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "expected 401 for {uri}");
    }
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn weather_unconfigured(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, Vec::new())
        .await
        .expect("failed to create test app");

    let (status, _) = get_json(&mut app, "/api/v1/weather").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn fake_jwt(claims: Value) -> String {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.unverified-signature")
}

fn request_complete(raw: &[u8]) -> bool {
    let Some(end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let headers = String::from_utf8_lossy(&raw[..end]).to_lowercase();
    let length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    raw.len() >= end + 4 + length
}

/// Answers a single HTTP request with a canned token-endpoint response.
async fn canned_token_endpoint(status: &'static str, body: Value) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub endpoint");
    let addr = listener.local_addr().expect("stub endpoint has no address");
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept failed");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).await.expect("read failed");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_complete(&request) {
                break;
            }
        }
        let body = body.to_string();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .await
            .expect("write failed");
    });
    format!("http://{addr}/oauth2/token")
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn oauth_callback_logs_the_user_in(pool: Pool<Sqlite>) {
    let token_url = canned_token_endpoint(
        "200 OK",
        json!({
            "access_token": "access-1",
            "id_token": fake_jwt(json!({
                "sub": "sub-oauth-1",
                "email": "visitor@example.com",
            })),
            "refresh_token": "refresh-1",
            "expires_in": 3600,
        }),
    )
    .await;
    let (mut app, _state) = test_app_with_token_url(pool, Vec::new(), token_url)
        .await
        .expect("failed to create test app");

    let request = Request::builder()
        .uri("/auth/callback?code=the-code")
        .method("GET")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app
        .as_service()
        .call(request)
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = response
        .headers()
        .get("set-cookie")
        .expect("no session cookie")
        .to_str()
        .expect("unreadable cookie")
        .to_string();

    // the session now reaches the authed routes, with default settings for
    // the freshly created user
    let request = Request::builder()
        .uri("/api/v1/settings")
        .method("GET")
        .header("Cookie", cookie)
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app
        .as_service()
        .call(request)
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("expected json body");
    assert_eq!(body["show_marker_titles"], false);
    assert_eq!(
        body["selected_categories"],
        json!(["1", "2", "3", "5", "6", "9"])
    );
}

#[test(sqlx::test(migrations = "../db/migrations/"))]
async fn oauth_callback_reports_refused_logins(pool: Pool<Sqlite>) {
    let (mut app, _state) = test_app(pool, Vec::new())
        .await
        .expect("failed to create test app");

    let (status, _) = get_json(&mut app, "/auth/callback?error=access_denied").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // no code and no error is also a refusal
    let (status, _) = get_json(&mut app, "/auth/callback").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
