//! # Tests Module
//!
//! HTTP-level tests for the feedline web service.
//!
//! ## Test Categories
//!
//! ### Unit Tests
//! - Server configuration (`get_server_port`)
//!
//! ### Integration Tests
//! - Every route, driven through the full `Router` with `oneshot`
//! - Upstream calls answered by an in-process mock of the platform API bound to
//!   `127.0.0.1:0`, so no test talks to the real platform
//! - Configuration errors, upstream failures and mapping failures
//!
//! ## Test Environment
//!
//! Credentials are injected through `FeedConfig` values; only the port test
//! touches the process environment.

use crate::{
    config::{get_server_port, FeedConfig},
    handlers::{create_router, handle_health, AppState},
    oauth::Signer,
    twitter::TwitterClient,
};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Request, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

const ACCOUNT_ID: &str = "1000";
/// A user without tweets.
const QUIET_USER: &str = "7";
/// A user whose tweets call fails upstream.
const BROKEN_USER: &str = "13";
/// Pagination tokens are opaque and may carry any of these characters.
const OPAQUE_TOKEN: &str = "a+b/c= d";

/// Paths of every request the mock platform received.
type RequestLog = Arc<Mutex<Vec<String>>>;

// =============================================================================
// Mock upstream platform
// =============================================================================

fn user_json(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "name": format!("{} name", username),
        "verified": true,
        "protected": false,
        "public_metrics": {"followers_count": 2500, "following_count": 10, "tweet_count": 300}
    })
}

fn tweet_json(id: &str, author_id: &str, text: &str, likes: u64) -> Value {
    json!({
        "id": id,
        "author_id": author_id,
        "text": text,
        "created_at": "2023-03-01T12:00:00.000Z",
        "conversation_id": id,
        "reply_settings": "everyone",
        "public_metrics": {"retweet_count": 0, "quote_count": 0, "like_count": likes, "reply_count": 0}
    })
}

/// Recomputes the OAuth 1.0a header over the path and query that actually
/// arrived, using the nonce and timestamp the client sent.
fn is_signed(headers: &HeaderMap, uri: &Uri) -> bool {
    let auth = match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(auth) => auth,
        None => return false,
    };
    let host = match headers.get(header::HOST).and_then(|v| v.to_str().ok()) {
        Some(host) => host,
        None => return false,
    };
    let fields: HashMap<&str, &str> = match auth.strip_prefix("OAuth ") {
        Some(rest) => rest
            .split(", ")
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| (k, v.trim_matches('"')))
            .collect(),
        None => return false,
    };
    let (nonce, timestamp) = match (fields.get("oauth_nonce"), fields.get("oauth_timestamp")) {
        (Some(nonce), Some(timestamp)) => (*nonce, *timestamp),
        _ => return false,
    };

    let received: Vec<(String, String)> =
        url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
            .into_owned()
            .collect();
    let signer = Signer::from_config(&full_config(String::new())).unwrap();
    let expected = signer
        .sign_with(
            "GET",
            &format!("http://{}{}", host, uri.path()),
            &received,
            nonce,
            timestamp,
        )
        .unwrap();
    expected == auth
}

fn has_bearer(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "Bearer bearer-token")
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"title": "Unauthorized"}))).into_response()
}

async fn mock_timeline(
    headers: HeaderMap,
    uri: Uri,
    Path(id): Path<String>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    if !is_signed(&headers, &uri) || id != ACCOUNT_ID {
        return unauthorized();
    }
    match q.get("pagination_token").map(String::as_str) {
        None => {}
        Some("page2") | Some(OPAQUE_TOKEN) => {
            return Json(json!({
                "data": [tweet_json("30", "u1", "last one", 1)],
                "includes": {"users": [user_json("u1", "alice")]},
                "meta": {"result_count": 1}
            }))
            .into_response();
        }
        Some(_) => return (StatusCode::BAD_REQUEST, "unknown pagination token").into_response(),
    }

    let mut quote = tweet_json("10", "u1", "Hey @abc look https://t.co/Quote1", 4);
    quote["referenced_tweets"] = json!([{"type": "quoted", "id": "11"}]);
    quote["entities"] = json!({
        "mentions": [{"start": 4, "end": 8, "username": "abc", "id": "123"}],
        "urls": [{
            "start": 14, "end": 33,
            "url": "https://t.co/Quote1",
            "expanded_url": "https://twitter.com/bob/status/11",
            "display_url": "twitter.com/bob/status/11"
        }]
    });
    Json(json!({
        "data": [quote, tweet_json("12", "u2", "plain tweet", 2)],
        "includes": {
            "users": [user_json("u1", "alice"), user_json("u2", "bob")],
            "tweets": [tweet_json("11", "u2", "quoted original", 9)]
        },
        "meta": {"result_count": 2, "next_token": "page2"}
    }))
    .into_response()
}

async fn mock_user(headers: HeaderMap, uri: Uri, Path(id): Path<String>) -> Response {
    if !is_signed(&headers, &uri) {
        return unauthorized();
    }
    if id == "404" {
        return Json(json!({
            "errors": [{"title": "Not Found Error", "detail": "Could not find user"}]
        }))
        .into_response();
    }
    let mut user = user_json(&id, &format!("user{}", id));
    user["description"] = json!("just testing");
    user["created_at"] = json!("2012-06-01T00:00:00.000Z");
    user["location"] = json!("Bergen");
    Json(json!({
        "data": user,
        "includes": {"tweets": [tweet_json("500", &id, "pinned hello", 7)]}
    }))
    .into_response()
}

async fn mock_user_tweets(headers: HeaderMap, uri: Uri, Path(id): Path<String>) -> Response {
    if !is_signed(&headers, &uri) {
        return unauthorized();
    }
    match id.as_str() {
        QUIET_USER => Json(json!({"meta": {"result_count": 0}})).into_response(),
        BROKEN_USER => (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response(),
        _ => Json(json!({
            "data": [tweet_json("600", &id, "my tweet", 3)],
            "includes": {"users": [user_json(&id, &format!("user{}", id))]},
            "meta": {"result_count": 1, "next_token": "more"}
        }))
        .into_response(),
    }
}

async fn mock_search(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !has_bearer(&headers) {
        return unauthorized();
    }
    let query = q.get("query").cloned().unwrap_or_default();
    if !query.ends_with("-is:retweet -is:reply is:verified lang:en") {
        return (StatusCode::BAD_REQUEST, "missing operators").into_response();
    }
    if query.starts_with("orphan") {
        return Json(json!({
            "data": [tweet_json("1", "ghost", "nobody wrote this", 0)],
            "includes": {"users": []}
        }))
        .into_response();
    }
    Json(json!({
        "data": [
            tweet_json("a", "u1", "ten", 10),
            tweet_json("b", "u1", "fifty", 50),
            tweet_json("c", "u1", "five", 5)
        ],
        "includes": {"users": [user_json("u1", "alice")]}
    }))
    .into_response()
}

async fn mock_trends(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if !has_bearer(&headers) {
        return unauthorized();
    }
    assert_eq!(q.get("id").map(String::as_str), Some("23424977"));
    assert_eq!(q.get("exclude").map(String::as_str), Some("hashtags"));
    Json(json!([{
        "trends": [
            {"name": "Quiet", "url": "http://twitter.com/search?q=Quiet", "query": "Quiet", "promoted_content": null, "tweet_volume": null},
            {"name": "Small", "url": "http://twitter.com/search?q=Small", "query": "Small", "promoted_content": null, "tweet_volume": 15000},
            {"name": "Big", "url": "http://twitter.com/search?q=Big", "query": "Big", "promoted_content": null, "tweet_volume": 980000}
        ],
        "as_of": "2023-03-01T12:00:00Z",
        "locations": [{"name": "United States", "woeid": 23424977}]
    }]))
    .into_response()
}

async fn record_request(
    State(log): State<RequestLog>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    log.lock().unwrap().push(request.uri().path().to_string());
    next.run(request).await
}

/// Starts the mock platform and returns its base URL.
async fn spawn_upstream() -> String {
    spawn_recording_upstream().await.0
}

/// Starts the mock platform and returns its base URL and request log.
async fn spawn_recording_upstream() -> (String, RequestLog) {
    let log = RequestLog::default();
    let app = Router::new()
        .route(
            "/2/users/:id/timelines/reverse_chronological",
            get(mock_timeline),
        )
        .route("/2/users/:id", get(mock_user))
        .route("/2/users/:id/tweets", get(mock_user_tweets))
        .route("/2/tweets/search/recent", get(mock_search))
        .route("/1.1/trends/place.json", get(mock_trends))
        .layer(middleware::from_fn_with_state(log.clone(), record_request));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), log)
}

// =============================================================================
// Helpers
// =============================================================================

fn full_config(api_base: String) -> FeedConfig {
    FeedConfig {
        consumer_key: Some("ck".into()),
        consumer_secret: Some("cs".into()),
        access_token: Some("at".into()),
        access_token_secret: Some("ats".into()),
        bearer_token: Some("bearer-token".into()),
        account_id: Some(ACCOUNT_ID.into()),
        api_base,
        ..Default::default()
    }
}

/// Creates a test application instance with all routes configured.
fn create_test_app(config: FeedConfig) -> Router {
    let client = tokio_test::assert_ok!(TwitterClient::new(config));
    create_router(AppState { client })
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json_response: Value = serde_json::from_slice(&body).unwrap();
    (status, headers, json_response)
}

// =============================================================================
// Tests
// =============================================================================

/// Tests the health endpoint handler function directly.
#[tokio::test]
async fn test_handle_health() {
    let Json(json_response) = handle_health().await;
    assert_eq!(json_response["status"], "healthy");
    assert_eq!(json_response["service"], "feedline");
}

/// Integration test for the health endpoint (GET /health).
#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(FeedConfig::default());
    let (status, headers, body) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "no-store");
}

/// The timeline is signed, normalized and forwards the upstream `next_token`.
#[tokio::test]
async fn test_timeline_endpoint() {
    let base = spawn_upstream().await;
    let (status, _, body) = get_json(create_test_app(full_config(base)), "/timeline").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_token"], "page2");

    let tweets = body["tweets"].as_array().unwrap();
    assert_eq!(tweets.len(), 2);

    let quote = &tweets[0];
    assert_eq!(quote["text"], "Hey @abc look");
    assert_eq!(quote["author"]["username"], "alice");
    assert_eq!(
        quote["mentions"],
        json!([{"start": 4, "end": 8, "username": "abc", "id": "123"}])
    );
    assert!(quote.get("urls").is_none());
    assert_eq!(quote["referenced_tweet"]["reference_type"], "quoted");
    assert_eq!(quote["referenced_tweet"]["text"], "quoted original");
    assert_eq!(quote["referenced_tweet"]["author"]["username"], "bob");

    let plain = &tweets[1];
    assert!(plain.get("referenced_tweet").is_none());
    assert_eq!(plain["metrics"]["like_count"], 2);
}

/// The last page has no `next_token` key at all.
#[tokio::test]
async fn test_timeline_last_page() {
    let base = spawn_upstream().await;
    let (status, _, body) =
        get_json(create_test_app(full_config(base)), "/timeline?token=page2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tweets"].as_array().unwrap().len(), 1);
    assert!(body.get("next_token").is_none());
}

/// An empty `?token=` is the first page.
#[tokio::test]
async fn test_timeline_empty_token_is_first_page() {
    let base = spawn_upstream().await;
    let (status, _, body) =
        get_json(create_test_app(full_config(base)), "/timeline?token=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["next_token"], "page2");
}

/// Opaque tokens reach the platform intact and are covered by the signature.
#[tokio::test]
async fn test_timeline_opaque_token_is_signed_as_sent() {
    let base = spawn_upstream().await;
    let uri = format!("/timeline?token={}", urlencoding::encode(OPAQUE_TOKEN));
    let (status, _, body) = get_json(create_test_app(full_config(base)), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tweets"][0]["text"], "last one");
}

/// Upstream rejection of the signature is reported as a bad gateway.
#[tokio::test]
async fn test_timeline_rejected_signature() {
    let base = spawn_upstream().await;
    let mut config = full_config(base);
    config.consumer_key = Some("wrong".into());
    let (status, _, body) = get_json(create_test_app(config), "/timeline").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("(401)"));
}

#[tokio::test]
async fn test_trends_endpoint() {
    let base = spawn_upstream().await;
    let (status, _, body) = get_json(create_test_app(full_config(base)), "/trends").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["trends"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Big", "Small", "Quiet"]);
    assert_eq!(body["trends"][0]["tweet_volume"], 980000);
    assert!(body["trends"][2]["tweet_volume"].is_null());
}

#[tokio::test]
async fn test_search_endpoint_ranked_and_unranked() {
    let base = spawn_upstream().await;

    let (status, _, body) = get_json(
        create_test_app(full_config(base.clone())),
        "/tweets/search/rustlang?ranked=true",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body["tweets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["b", "a", "c"]);

    let (status, _, body) =
        get_json(create_test_app(full_config(base)), "/tweets/search/rustlang").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body["tweets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

/// A tweet whose author is missing from `includes` fails the whole page.
#[tokio::test]
async fn test_search_inconsistent_upstream() {
    let base = spawn_upstream().await;
    let (status, _, body) =
        get_json(create_test_app(full_config(base)), "/tweets/search/orphan").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Inconsistent upstream response");
    assert!(body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn test_user_profile_endpoint() {
    let (base, log) = spawn_recording_upstream().await;
    let (status, _, body) = get_json(create_test_app(full_config(base)), "/users/42").await;

    let mut seen = log.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["/2/users/42", "/2/users/42/tweets"]);

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["id"], "42");
    assert_eq!(body["profile"]["username"], "user42");
    assert_eq!(body["profile"]["bio"]["location"], "Bergen");
    assert!(body["profile"]["bio"].get("url").is_none());
    assert_eq!(body["profile"]["pinned_tweet"]["text"], "pinned hello");
    assert_eq!(body["profile"]["pinned_tweet"]["author"]["id"], "42");
    assert_eq!(body["tweets"][0]["text"], "my tweet");
    assert_eq!(body["next_token"], "more");
}

#[tokio::test]
async fn test_me_endpoint_uses_account_id() {
    let base = spawn_upstream().await;
    let (status, _, body) = get_json(create_test_app(full_config(base)), "/users/me").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["id"], ACCOUNT_ID);
}

#[tokio::test]
async fn test_user_without_tweets() {
    let base = spawn_upstream().await;
    let (status, _, body) = get_json(create_test_app(full_config(base)), &format!("/users/{}", QUIET_USER)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tweets"], json!([]));
    assert!(body.get("next_token").is_none());
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let base = spawn_upstream().await;
    let (status, _, body) = get_json(create_test_app(full_config(base)), "/users/404").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Profile not found");
}

/// An id that would add path segments is rejected before anything is signed.
#[tokio::test]
async fn test_user_id_cannot_reach_other_endpoints() {
    let (base, log) = spawn_recording_upstream().await;
    let app = create_test_app(full_config(base));

    let (status, _, body) = get_json(app.clone(), "/users/1%2Ffollowers").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid user id");

    let (status, _, _) = get_json(app, "/users/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(log.lock().unwrap().is_empty());
}

/// If one of the two concurrent calls fails, the whole page fails.
#[tokio::test]
async fn test_profile_fails_when_tweets_call_fails() {
    let base = spawn_upstream().await;
    let (status, _, body) = get_json(create_test_app(full_config(base)), &format!("/users/{}", BROKEN_USER)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("user_tweets"));
}

/// Missing credentials are reported before any upstream call is made.
#[tokio::test]
async fn test_missing_credentials() {
    let app = create_test_app(FeedConfig::default());
    let (status, _, body) = get_json(app, "/timeline").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("TWITTER_ACCOUNT_ID"));

    let config = FeedConfig {
        account_id: Some(ACCOUNT_ID.into()),
        ..Default::default()
    };
    let (status, _, body) = get_json(create_test_app(config), "/users/me").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("TWITTER_CONSUMER_KEY"));

    let app = create_test_app(FeedConfig::default());
    let (status, _, body) = get_json(app, "/trends").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Service is not configured");
    assert!(body["error"].as_str().unwrap().contains("TWITTER_BEARER_TOKEN"));
}

/// Unit test for the get_server_port function.
#[test]
fn test_get_server_port() {
    std::env::remove_var("PORT");
    assert_eq!(get_server_port(), 3000);

    std::env::set_var("PORT", "8080");
    assert_eq!(get_server_port(), 8080);

    std::env::set_var("PORT", "not-a-port");
    assert_eq!(get_server_port(), 3000);

    std::env::remove_var("PORT");
}
