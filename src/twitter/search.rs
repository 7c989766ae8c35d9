//! Recent-tweet search.
//!
//! The caller's query is narrowed with fixed operators so that only original,
//! English tweets from verified accounts come back.

use log::info;

use crate::error::FeedResult;
use crate::model::{SearchResponse, Tweet};

use super::api::{
    TwitterClient, FEED_USER_FIELDS, MEDIA_FIELDS, PAGE_SIZE, TWEET_EXPANSIONS, TWEET_FIELDS,
};
use super::normalize::parse_tweets;
use super::raw::RawTweetsEnvelope;

/// Operators appended to every search query.
pub const SEARCH_OPERATORS: [&str; 4] = ["-is:retweet", "-is:reply", "is:verified", "lang:en"];

/// Maximum number of tweets returned by a ranked search.
pub const RANKED_LIMIT: usize = 10;

/// The caller's query followed by the fixed filter operators.
pub fn build_search_query(query: &str) -> String {
    let mut parts = vec![query.trim()];
    parts.extend(SEARCH_OPERATORS);
    parts.join(" ")
}

/// Path and percent-encoded query string of the recent-search endpoint.
pub(crate) fn search_path(query: &str) -> String {
    format!(
        "/2/tweets/search/recent?query={}&expansions={}&media.fields={}&tweet.fields={}&user.fields={}&max_results={}",
        urlencoding::encode(&build_search_query(query)),
        TWEET_EXPANSIONS,
        MEDIA_FIELDS,
        TWEET_FIELDS,
        FEED_USER_FIELDS,
        PAGE_SIZE
    )
}

/// Orders tweets by the sum of their four metric counts, highest first, and
/// keeps at most [`RANKED_LIMIT`]. Ties keep their upstream order.
pub fn rank_tweets(mut tweets: Vec<Tweet>) -> Vec<Tweet> {
    tweets.sort_by(|a, b| b.body.metrics.total().cmp(&a.body.metrics.total()));
    tweets.truncate(RANKED_LIMIT);
    tweets
}

/// Searches recent tweets.
///
/// # Parameters
///
/// - `query`: Free-text query as entered by the user
/// - `ranked`: Sort by engagement and keep the top [`RANKED_LIMIT`]
pub async fn search_tweets(
    client: &TwitterClient,
    query: &str,
    ranked: bool,
) -> FeedResult<SearchResponse> {
    info!("Searching tweets for '{}' (ranked: {})", query, ranked);

    let url = client.endpoint(&search_path(query));
    let envelope: RawTweetsEnvelope = client.get_bearer(&url, "search").await?;

    let mut tweets = parse_tweets(&envelope)?;
    if ranked {
        tweets = rank_tweets(tweets);
    }
    info!("Search for '{}' returned {} tweets", query, tweets.len());
    Ok(SearchResponse { tweets })
}
