//! Home timeline of the owning account.

use log::info;

use crate::error::FeedResult;
use crate::model::TimelinePage;

use super::api::{
    owned_params, TwitterClient, FEED_USER_FIELDS, MEDIA_FIELDS, PAGE_SIZE, TWEET_EXPANSIONS,
    TWEET_FIELDS,
};
use super::normalize::parse_tweets;
use super::raw::RawTweetsEnvelope;

/// Query parameters for one timeline page.
pub(crate) fn timeline_params(token: Option<&str>) -> Vec<(String, String)> {
    let mut params = owned_params(&[
        ("expansions", TWEET_EXPANSIONS),
        ("media.fields", MEDIA_FIELDS),
        ("tweet.fields", TWEET_FIELDS),
        ("user.fields", FEED_USER_FIELDS),
        ("max_results", PAGE_SIZE),
    ]);
    if let Some(token) = token {
        params.push(("pagination_token".to_string(), token.to_string()));
    }
    params
}

/// Fetches one page of the owning account's reverse-chronological timeline.
///
/// # Parameters
///
/// - `token`: Pagination token returned by the previous page, if any
///
/// # Returns
///
/// The normalized tweets and the upstream `next_token`, forwarded unchanged.
pub async fn fetch_timeline(client: &TwitterClient, token: Option<&str>) -> FeedResult<TimelinePage> {
    let account_id = client.config().account_id()?;
    info!(
        "Fetching timeline for account {} (token: {})",
        account_id,
        token.unwrap_or("<first page>")
    );

    let path = format!("/2/users/{}/timelines/reverse_chronological", account_id);
    let envelope: RawTweetsEnvelope = client
        .get_signed(&path, &timeline_params(token), "timeline")
        .await?;

    let tweets = parse_tweets(&envelope)?;
    info!("Timeline page contains {} tweets", tweets.len());
    Ok(TimelinePage {
        tweets,
        next_token: envelope.meta.next_token,
    })
}
