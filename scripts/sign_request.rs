//! OAuth 1.0a Request Signing Script
//!
//! Prints the `Authorization` header the service would send for a request,
//! together with a ready-to-run curl command. Useful for checking credentials
//! against the platform by hand.
//!
//! # Usage
//!
//! ```bash
//! export TWITTER_CONSUMER_KEY=...
//! export TWITTER_CONSUMER_SECRET=...
//! export TWITTER_ACCESS_TOKEN=...
//! export TWITTER_ACCESS_TOKEN_SECRET=...
//! cargo run --bin sign_request -- GET https://api.twitter.com/2/users/me user.fields=verified
//! ```
//!
//! Query parameters may be given in the URL, as trailing `key=value`
//! arguments, or both.

use feedline::{oauth::percent_encode, FeedConfig, Signer};
use std::env;
use url::Url;

/// Splits a URL into its base (no query, no fragment) and its query pairs.
fn split_url(raw: &str) -> Result<(String, Vec<(String, String)>), url::ParseError> {
    let mut url = Url::parse(raw)?;
    let params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    url.set_fragment(None);
    Ok((url.to_string(), params))
}

/// Parses a trailing `key=value` argument.
fn parse_param(arg: &str) -> Option<(String, String)> {
    let (key, value) = arg.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

fn print_usage() {
    eprintln!("Usage: sign_request <METHOD> <URL> [key=value ...]");
    eprintln!();
    eprintln!("Reads TWITTER_CONSUMER_KEY, TWITTER_CONSUMER_SECRET,");
    eprintln!("TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_TOKEN_SECRET from the environment.");
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(2);
    }

    let method = &args[0];
    let (base_url, mut params) = split_url(&args[1])?;
    for arg in &args[2..] {
        match parse_param(arg) {
            Some(pair) => params.push(pair),
            None => {
                eprintln!("❌ Not a key=value parameter: {}", arg);
                std::process::exit(2);
            }
        }
    }

    let config = FeedConfig::from_env()?;
    let signer = Signer::from_config(&config)?;
    println!("🔐 Signing {} {}", method, base_url);
    println!("📋 Parameters: {}", params.len());

    let header = signer.sign(method, &base_url, &params)?;

    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let full_url = if query.is_empty() {
        base_url
    } else {
        format!("{}?{}", base_url, query)
    };

    println!();
    println!("Authorization: {}", header);
    println!();
    println!("curl -X {} '{}' -H 'Authorization: {}'", method, full_url, header);
    Ok(())
}
