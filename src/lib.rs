//! # Feedline Library
//!
//! A Rust web service library that serves a social-media feed (home timeline,
//! trending topics, search, user profiles) by proxying the Twitter/X REST API
//! and reshaping its reference-based JSON into self-contained values.
//!
//! ## Features
//!
//! - OAuth 1.0a (HMAC-SHA1) request signing for user-context endpoints
//! - Bearer Token authentication for trends and search
//! - Tweet-graph normalization: authors, quoted/retweeted tweets, mention and
//!   URL spans are resolved and embedded
//! - Structured logging
//! - Health check endpoint
//!
//! ## Configuration
//!
//! - `TWITTER_CONSUMER_KEY`, `TWITTER_CONSUMER_SECRET`, `TWITTER_ACCESS_TOKEN`,
//!   `TWITTER_ACCESS_TOKEN_SECRET`: OAuth 1.0a credentials
//! - `TWITTER_BEARER_TOKEN`: app-only token
//! - `TWITTER_ACCOUNT_ID`: id of the owning account
//! - `PORT`: Server port (defaults to 3000)
//!
//! ## API Endpoints
//!
//! - `GET /timeline?token=`: Home timeline page
//! - `GET /trends`: Trending topics, highest volume first
//! - `GET /tweets/search/:query?ranked=`: Recent-tweet search
//! - `GET /users/:id?token=`: Profile and tweets of a user
//! - `GET /users/me?token=`: Profile and tweets of the owning account
//! - `GET /health`: Returns service health status

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod oauth;
pub mod render;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::{get_server_port, FeedConfig};
pub use error::{FeedError, FeedResult};
pub use handlers::{create_router, AppState};
pub use model::{Author, Profile, ReferenceType, Trend, Tweet, TweetBody};
pub use oauth::{build_bearer_auth_header, Signer};
pub use render::{format_number, segment_text, TextSegment};
pub use twitter::{parse_tweets, TwitterClient};

#[cfg(test)]
mod tests;
