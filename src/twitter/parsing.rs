//! Text parsing utilities for Twitter content.
//!
//! This module contains the regex-based helpers that rewrite tweet text during
//! normalization.

use regex::Regex;
use std::sync::OnceLock;

/// Matches the short link the platform appends to a quote tweet's text.
fn quote_link_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s?(https://t\.co/[A-Za-z0-9]+)$").ok())
        .as_ref()
}

/// Removes the trailing `https://t.co/...` link from a quote tweet's text.
///
/// The platform always appends the link to the quoted tweet as the last token,
/// preceded by at most one whitespace character; only that one is removed.
///
/// # Parameters
///
/// - `text`: The raw tweet text
///
/// # Returns
///
/// The text without the link, and the removed link if there was one.
pub fn strip_quote_link(text: &str) -> (String, Option<String>) {
    let Some(re) = quote_link_regex() else {
        return (text.to_string(), None);
    };
    match re.captures(text) {
        Some(caps) => {
            let whole = caps.get(0).map_or(text.len(), |m| m.start());
            let link = caps.get(1).map(|m| m.as_str().to_string());
            (text[..whole].to_string(), link)
        }
        None => (text.to_string(), None),
    }
}
