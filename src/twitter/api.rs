//! Core Twitter API utilities.
//!
//! This module contains the upstream client used by every endpoint: it signs
//! requests (OAuth 1.0a or Bearer Token), sends them with the configured
//! timeout and turns non-success statuses into [`FeedError::UpstreamStatus`].

use log::{debug, error, info};
use reqwest::{header::AUTHORIZATION, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::oauth::{build_bearer_auth_header, Signer};

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum number of characters before truncation
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let truncated: String = sanitized.chars().take(max_len).collect();
        format!("{}... [truncated, {} total bytes]", truncated, text.len())
    } else {
        sanitized
    }
}

/// Client for the upstream platform.
///
/// Cheap to clone: the HTTP connection pool and the configuration are shared.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: Client,
    config: Arc<FeedConfig>,
}

impl TwitterClient {
    /// Builds a client whose requests time out after `config.upstream_timeout`.
    pub fn new(config: FeedConfig) -> FeedResult<Self> {
        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(TwitterClient {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Absolute upstream URL for a path such as `/2/users/1`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base, path)
    }

    /// Sends a GET signed with the owning account's OAuth 1.0a credentials.
    ///
    /// The same parameters are signed and sent as the query string.
    ///
    /// # Errors
    ///
    /// Fails with [`FeedError::MissingCredential`] before any network I/O if
    /// one of the four OAuth secrets is not configured.
    pub(crate) async fn get_signed<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        operation: &'static str,
    ) -> FeedResult<T> {
        let signer = Signer::from_config(&self.config)?;
        let url = self.endpoint(path);
        let auth_header = signer.sign("GET", &url, params)?;

        debug!("Request URL for '{}': {}", operation, url);
        debug!("Request headers: Authorization: OAuth [REDACTED]");
        let request = self
            .http
            .get(&url)
            .query(params)
            .header(AUTHORIZATION, auth_header);
        self.send_json(request, operation).await
    }

    /// Sends a GET with the app-only Bearer Token to a full URL (query included).
    pub(crate) async fn get_bearer<T: DeserializeOwned>(
        &self,
        url: &str,
        operation: &'static str,
    ) -> FeedResult<T> {
        let bearer_token = self.config.bearer_token()?;

        debug!("Request URL for '{}': {}", operation, url);
        debug!("Request headers: Authorization: Bearer [REDACTED]");
        let request = self
            .http
            .get(url)
            .header(AUTHORIZATION, build_bearer_auth_header(bearer_token));
        self.send_json(request, operation).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> FeedResult<T> {
        info!("Making upstream request for operation: {}", operation);

        let response = request.send().await.map_err(|e| {
            error!("Operation '{}' failed to reach upstream: {}", operation, e);
            FeedError::Http(e)
        })?;
        let status = response.status();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation
        );

        let body = response.text().await?;
        if !status.is_success() {
            error!("Operation '{}' failed - Status: {}", operation, status);
            debug!(
                "Error response for '{}': {}",
                operation,
                sanitize_for_logging(&body, 200)
            );
            return Err(FeedError::UpstreamStatus {
                operation,
                status: status.as_u16(),
            });
        }

        debug!(
            "Response summary for '{}': {} bytes received",
            operation,
            body.len()
        );
        serde_json::from_str(&body).map_err(|e| {
            error!("Operation '{}' returned an unexpected body: {}", operation, e);
            debug!("Body for '{}': {}", operation, sanitize_for_logging(&body, 200));
            FeedError::Json(e)
        })
    }
}

/// Field selections shared by every tweet-list request.
pub(crate) const TWEET_EXPANSIONS: &str = "attachments.media_keys,author_id,entities.mentions.username,referenced_tweets.id,referenced_tweets.id.author_id";
pub(crate) const MEDIA_FIELDS: &str = "url,public_metrics,alt_text";
pub(crate) const TWEET_FIELDS: &str =
    "conversation_id,created_at,entities,public_metrics,reply_settings";
pub(crate) const FEED_USER_FIELDS: &str = "protected,public_metrics,verified";
pub(crate) const PROFILE_USER_FIELDS: &str =
    "created_at,description,entities,location,protected,public_metrics,url,verified";
pub(crate) const PAGE_SIZE: &str = "10";

/// Turns `(&str, &str)` pairs into the owned form the signer takes.
pub(crate) fn owned_params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
