//! Configuration module for the feedline service.
//!
//! This module contains the configuration struct and environment variable handling
//! for the Twitter/X API integration. Configuration is read once at startup and
//! passed explicitly to the signer and the upstream client.

use log::{debug, info, warn};
use std::env;
use std::time::Duration;

use crate::error::{FeedError, FeedResult};

/// Default upstream API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

/// Default trends location (Yahoo! WOEID for the United States).
pub const DEFAULT_TRENDS_WOEID: u32 = 23424977;

/// Default timeout applied to every upstream request, in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

pub const CONSUMER_KEY_VAR: &str = "TWITTER_CONSUMER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "TWITTER_CONSUMER_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "TWITTER_ACCESS_TOKEN_SECRET";
pub const BEARER_TOKEN_VAR: &str = "TWITTER_BEARER_TOKEN";
pub const ACCOUNT_ID_VAR: &str = "TWITTER_ACCOUNT_ID";
pub const API_BASE_VAR: &str = "TWITTER_API_BASE";
pub const TRENDS_WOEID_VAR: &str = "TWITTER_TRENDS_WOEID";
pub const UPSTREAM_TIMEOUT_VAR: &str = "UPSTREAM_TIMEOUT_SECS";

/// Configuration struct for Twitter/X API access.
///
/// Credentials are optional at load time. Each upstream call asks for the
/// credentials it needs and fails with [`FeedError::MissingCredential`] before
/// any network I/O if one is absent.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// OAuth 1.0a consumer (API) key
    pub consumer_key: Option<String>,
    /// OAuth 1.0a consumer (API) secret
    pub consumer_secret: Option<String>,
    /// OAuth 1.0a access token of the owning account
    pub access_token: Option<String>,
    /// OAuth 1.0a access token secret of the owning account
    pub access_token_secret: Option<String>,
    /// App-only bearer token used for trends and search
    pub bearer_token: Option<String>,
    /// Platform id of the owning account (home timeline and `/users/me`)
    pub account_id: Option<String>,
    /// Upstream base URL without trailing slash
    pub api_base: String,
    /// Location used for the trends snapshot
    pub trends_woeid: u32,
    /// Timeout applied to each upstream request
    pub upstream_timeout: Duration,
}

/// The four OAuth 1.0a secrets, borrowed from a [`FeedConfig`].
#[derive(Debug, Clone, Copy)]
pub struct OAuthCredentials<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub access_token: &'a str,
    pub access_token_secret: &'a str,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            consumer_key: None,
            consumer_secret: None,
            access_token: None,
            access_token_secret: None,
            bearer_token: None,
            account_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
            trends_woeid: DEFAULT_TRENDS_WOEID,
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl FeedConfig {
    /// Creates a new `FeedConfig` by reading the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `TWITTER_CONSUMER_KEY`, `TWITTER_CONSUMER_SECRET`, `TWITTER_ACCESS_TOKEN`,
    ///   `TWITTER_ACCESS_TOKEN_SECRET`: OAuth 1.0a credentials (timeline, profiles)
    /// - `TWITTER_BEARER_TOKEN`: app-only token (trends, search)
    /// - `TWITTER_ACCOUNT_ID`: id of the owning account
    /// - `TWITTER_API_BASE`: upstream base URL (defaults to `https://api.twitter.com`)
    /// - `TWITTER_TRENDS_WOEID`: trends location (defaults to 23424977)
    /// - `UPSTREAM_TIMEOUT_SECS`: upstream request timeout (defaults to 10)
    ///
    /// # Returns
    ///
    /// - `Ok(FeedConfig)`: Missing credentials are logged, not rejected
    /// - `Err(FeedError::InvalidConfig)`: If a present value is malformed
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use feedline::FeedConfig;
    ///
    /// let config = FeedConfig::from_env().unwrap();
    /// println!("Using upstream {}", config.api_base);
    /// ```
    pub fn from_env() -> FeedResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new `FeedConfig` from an arbitrary key lookup.
    ///
    /// Empty values are treated the same as absent ones.
    pub fn from_lookup<F>(lookup: F) -> FeedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading Twitter configuration");

        let read = |key: &'static str| -> Option<String> {
            match lookup(key).map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => Some(value),
                _ => None,
            }
        };
        let secret = |key: &'static str| -> Option<String> {
            let value = read(key);
            match &value {
                Some(v) => debug!("{} (masked): {}", key, mask_secret(v)),
                None => warn!("{} is not set - calls that need it will fail", key),
            }
            value
        };

        let consumer_key = secret(CONSUMER_KEY_VAR);
        let consumer_secret = secret(CONSUMER_SECRET_VAR);
        let access_token = secret(ACCESS_TOKEN_VAR);
        let access_token_secret = secret(ACCESS_TOKEN_SECRET_VAR);
        let bearer_token = secret(BEARER_TOKEN_VAR);

        let account_id = read(ACCOUNT_ID_VAR);
        match &account_id {
            Some(id) if !is_numeric_id(id) => {
                return Err(FeedError::InvalidConfig {
                    reason: format!("{} must be a numeric user id", ACCOUNT_ID_VAR),
                });
            }
            Some(id) => info!("Owning account id: {}", id),
            None => warn!("{} is not set - /timeline and /users/me will fail", ACCOUNT_ID_VAR),
        }

        let api_base = match read(API_BASE_VAR) {
            Some(base) => normalize_api_base(&base)?,
            None => DEFAULT_API_BASE.to_string(),
        };

        let trends_woeid = match read(TRENDS_WOEID_VAR) {
            Some(raw) => raw.parse().map_err(|e| FeedError::InvalidConfig {
                reason: format!("{} must be a number: {}", TRENDS_WOEID_VAR, e),
            })?,
            None => DEFAULT_TRENDS_WOEID,
        };

        let timeout_secs = match read(UPSTREAM_TIMEOUT_VAR) {
            Some(raw) => raw.parse().map_err(|e| FeedError::InvalidConfig {
                reason: format!("{} must be a number of seconds: {}", UPSTREAM_TIMEOUT_VAR, e),
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(FeedError::InvalidConfig {
                reason: format!("{} must be greater than zero", UPSTREAM_TIMEOUT_VAR),
            });
        }

        let config = FeedConfig {
            consumer_key,
            consumer_secret,
            access_token,
            access_token_secret,
            bearer_token,
            account_id,
            api_base,
            trends_woeid,
            upstream_timeout: Duration::from_secs(timeout_secs),
        };

        info!(
            "Twitter configuration loaded (api_base={}, oauth={}, bearer={})",
            config.api_base,
            config.oauth_credentials().is_ok(),
            config.bearer_token.is_some()
        );
        Ok(config)
    }

    /// Returns the four OAuth 1.0a secrets, or the first one that is missing.
    pub fn oauth_credentials(&self) -> FeedResult<OAuthCredentials<'_>> {
        Ok(OAuthCredentials {
            consumer_key: require(&self.consumer_key, CONSUMER_KEY_VAR)?,
            consumer_secret: require(&self.consumer_secret, CONSUMER_SECRET_VAR)?,
            access_token: require(&self.access_token, ACCESS_TOKEN_VAR)?,
            access_token_secret: require(&self.access_token_secret, ACCESS_TOKEN_SECRET_VAR)?,
        })
    }

    /// Returns the app-only bearer token.
    pub fn bearer_token(&self) -> FeedResult<&str> {
        require(&self.bearer_token, BEARER_TOKEN_VAR)
    }

    /// Returns the owning account's id.
    pub fn account_id(&self) -> FeedResult<&str> {
        require(&self.account_id, ACCOUNT_ID_VAR)
    }
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> FeedResult<&'a str> {
    value
        .as_deref()
        .ok_or(FeedError::MissingCredential { name })
}

/// Platform user ids are non-empty strings of ASCII digits.
pub(crate) fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn normalize_api_base(raw: &str) -> FeedResult<String> {
    let parsed = url::Url::parse(raw).map_err(|e| FeedError::InvalidConfig {
        reason: format!("{} is not a valid URL: {}", API_BASE_VAR, e),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FeedError::InvalidConfig {
            reason: format!("{} must use http or https", API_BASE_VAR),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Masks a secret for logging, keeping only a short prefix.
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{}...", prefix)
}

/// Gets the server port from environment variables or returns the default.
///
/// Reads `PORT`; falls back to 3000 when it is unset or not a valid port.
pub fn get_server_port() -> u16 {
    match env::var("PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("PORT '{}' is not a valid port number, using 3000", raw);
            3000
        }),
        Err(_) => 3000,
    }
}
