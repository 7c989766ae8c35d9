//! OAuth authentication module for Twitter/X API integration.
//!
//! The timeline and user endpoints are called in the owning account's user
//! context and need OAuth 1.0a (HMAC-SHA1) signed requests. Trends and search
//! use OAuth 2.0 app-only Bearer Token authentication.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};

/// Everything except the RFC 3986 unreserved set. `!` is escaped too, which
/// plain URI-component encoding leaves alone.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Number of random bytes in a nonce before hex encoding.
const NONCE_BYTES: usize = 32;

/// Percent-encodes a string for use in an OAuth 1.0a signature.
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// OAuth 1.0a request signer holding the four user-context secrets.
#[derive(Clone)]
pub struct Signer {
    consumer_key: String,
    consumer_secret: String,
    access_token: String,
    access_token_secret: String,
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("consumer_key", &crate::config::mask_secret(&self.consumer_key))
            .field("access_token", &crate::config::mask_secret(&self.access_token))
            .finish_non_exhaustive()
    }
}

impl Signer {
    /// Creates a signer from the configured credentials.
    ///
    /// # Returns
    ///
    /// - `Ok(Signer)`: If all four secrets are configured
    /// - `Err(FeedError::MissingCredential)`: Naming the first missing secret
    pub fn from_config(config: &FeedConfig) -> FeedResult<Self> {
        let creds = config.oauth_credentials()?;
        Ok(Signer {
            consumer_key: creds.consumer_key.to_string(),
            consumer_secret: creds.consumer_secret.to_string(),
            access_token: creds.access_token.to_string(),
            access_token_secret: creds.access_token_secret.to_string(),
        })
    }

    /// Builds the `Authorization` header value for a request.
    ///
    /// A fresh nonce and timestamp are generated for every call.
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method, used as given (not upper-cased)
    /// - `url`: Request URL without query string
    /// - `params`: Query parameters that will be sent with the request
    pub fn sign(&self, method: &str, url: &str, params: &[(String, String)]) -> FeedResult<String> {
        let nonce = generate_nonce()?;
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.sign_with(method, url, params, &nonce, &timestamp)
    }

    /// Builds the `Authorization` header value with a caller-supplied nonce and
    /// timestamp. Deterministic for identical inputs.
    pub fn sign_with(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        nonce: &str,
        timestamp: &str,
    ) -> FeedResult<String> {
        let oauth_params: [(&str, &str); 6] = [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.access_token.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];

        let mut encoded: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .chain(
                oauth_params
                    .iter()
                    .map(|(k, v)| (percent_encode(k), percent_encode(v))),
            )
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            percent_encode(method),
            percent_encode(url),
            percent_encode(&param_string)
        );
        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.access_token_secret)
        );
        debug!("OAuth signature base string length: {}", base_string.len());

        let signature = hmac_sha1(&signing_key, &base_string)?;

        Ok(format!(
            "OAuth oauth_consumer_key=\"{}\", oauth_nonce=\"{}\", oauth_signature=\"{}\", \
             oauth_signature_method=\"{}\", oauth_timestamp=\"{}\", oauth_token=\"{}\", \
             oauth_version=\"{}\"",
            percent_encode(&self.consumer_key),
            percent_encode(nonce),
            percent_encode(&signature),
            SIGNATURE_METHOD,
            percent_encode(timestamp),
            percent_encode(&self.access_token),
            OAUTH_VERSION
        ))
    }
}

/// Generates a hex-encoded nonce from 32 cryptographically random bytes.
fn generate_nonce() -> FeedResult<String> {
    let mut bytes = [0u8; NONCE_BYTES];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| FeedError::Signing(format!("Failed to generate random nonce: {}", e)))?;
    Ok(hex::encode(bytes))
}

/// Computes HMAC-SHA1 and returns the base64-encoded digest.
fn hmac_sha1(key: &str, data: &str) -> FeedResult<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| FeedError::Signing(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Builds the Authorization header for OAuth 2.0 Bearer Token authentication.
///
/// # Example
///
/// ```rust
/// use feedline::build_bearer_auth_header;
///
/// let header = build_bearer_auth_header("your_bearer_token");
/// assert_eq!(header, "Bearer your_bearer_token");
/// ```
pub fn build_bearer_auth_header(bearer_token: &str) -> String {
    format!("Bearer {}", bearer_token)
}
