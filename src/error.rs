//! Error types for the feedline service.
//!
//! Every failure that can reach an HTTP caller is a [`FeedError`]. The variants
//! fall into three groups: configuration problems (detected before any network
//! call), upstream mapping problems (the platform returned an inconsistent
//! envelope) and upstream transport problems.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use serde_json::json;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type FeedResult<T> = Result<T, FeedError>;

/// Primary error type for feedline operations.
#[derive(Error, Debug)]
pub enum FeedError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A credential or identifier required by this call is not configured.
    #[error("Configuration error: {name} is not set")]
    MissingCredential { name: &'static str },

    /// A configuration value is present but malformed.
    #[error("Configuration error: {reason}")]
    InvalidConfig { reason: String },

    // =========================================================================
    // Upstream Mapping Errors
    // =========================================================================
    /// A tweet references an author that is absent from `includes.users`.
    #[error("Upstream mapping error: user {id} not found in includes")]
    MissingUser { id: String },

    /// A tweet references a tweet that is absent from `includes.tweets`.
    #[error("Upstream mapping error: tweet {id} not found in includes")]
    MissingTweet { id: String },

    // =========================================================================
    // Upstream Errors
    // =========================================================================
    /// The platform answered with a non-success status.
    #[error("Twitter API error for operation '{operation}' ({status})")]
    UpstreamStatus { operation: &'static str, status: u16 },

    /// The caller asked for a user id that is not a platform id.
    #[error("Invalid user id '{id}'")]
    InvalidUserId { id: String },

    /// The platform returned no user for the requested id.
    #[error("Profile {id} not found")]
    ProfileNotFound { id: String },

    /// Transport failure talking to the platform, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform returned a body that does not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Computing the request signature failed.
    #[error("Signing error: {0}")]
    Signing(String),
}

impl FeedError {
    /// Whether this error was raised before any upstream request was attempted.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FeedError::MissingCredential { .. } | FeedError::InvalidConfig { .. }
        )
    }

    /// HTTP status code reported to callers of the service.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FeedError::MissingCredential { .. }
            | FeedError::InvalidConfig { .. }
            | FeedError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FeedError::InvalidUserId { .. } => StatusCode::BAD_REQUEST,
            FeedError::ProfileNotFound { .. } => StatusCode::NOT_FOUND,
            FeedError::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            FeedError::MissingCredential { .. } | FeedError::InvalidConfig { .. } => {
                "Service is not configured"
            }
            FeedError::MissingUser { .. } | FeedError::MissingTweet { .. } => {
                "Inconsistent upstream response"
            }
            FeedError::InvalidUserId { .. } => "Invalid user id",
            FeedError::ProfileNotFound { .. } => "Profile not found",
            FeedError::Signing(_) => "Failed to sign upstream request",
            _ => "Upstream request failed",
        }
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        error!("Request failed with {}: {}", status, self);
        let body = Json(json!({
            "status": "error",
            "message": self.summary(),
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
