//! HTTP route handlers for the feedline service.
//!
//! This module contains the HTTP route handler functions and the router that
//! wires them together. Every data handler performs one orchestration call and
//! returns its envelope as JSON; failures are rendered by [`FeedError`].

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method},
    response::Json,
    routing::get,
    Router,
};
use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::error::FeedError;
use crate::model::{ProfilePage, SearchResponse, TimelinePage, TrendsResponse};
use crate::twitter::{
    fetch_own_profile, fetch_profile, fetch_timeline, fetch_trends, search_tweets, TwitterClient,
};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: TwitterClient,
}

/// `?token=` query of the paginated endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub token: Option<String>,
}

impl PageQuery {
    /// The pagination token; an empty `?token=` means the first page.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// `?ranked=` query of the search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub ranked: bool,
}

/// Builds the application router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health`
/// - `GET /timeline?token=`
/// - `GET /trends`
/// - `GET /tweets/search/:query?ranked=`
/// - `GET /users/me?token=`
/// - `GET /users/:id?token=`
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/timeline", get(handle_timeline))
        .route("/trends", get(handle_trends))
        .route("/tweets/search/:query", get(handle_search))
        .route("/users/me", get(handle_me))
        .route("/users/:id", get(handle_user))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
        .with_state(state)
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "feedline"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "feedline"}))
}

/// Handles GET requests to the `/timeline` endpoint.
pub async fn handle_timeline(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<TimelinePage>, FeedError> {
    let timeline = fetch_timeline(&state.client, page.token()).await?;
    info!("Serving timeline page with {} tweets", timeline.tweets.len());
    Ok(Json(timeline))
}

/// Handles GET requests to the `/trends` endpoint.
pub async fn handle_trends(
    State(state): State<AppState>,
) -> Result<Json<TrendsResponse>, FeedError> {
    Ok(Json(fetch_trends(&state.client).await?))
}

/// Handles GET requests to the `/tweets/search/:query` endpoint.
///
/// With `?ranked=true` the results are ordered by engagement and capped at ten.
pub async fn handle_search(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, FeedError> {
    Ok(Json(search_tweets(&state.client, &query, params.ranked).await?))
}

/// Handles GET requests to the `/users/:id` endpoint.
pub async fn handle_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ProfilePage>, FeedError> {
    Ok(Json(fetch_profile(&state.client, &id, page.token()).await?))
}

/// Handles GET requests to the `/users/me` endpoint.
pub async fn handle_me(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ProfilePage>, FeedError> {
    Ok(Json(fetch_own_profile(&state.client, page.token()).await?))
}
