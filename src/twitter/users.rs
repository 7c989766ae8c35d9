//! User profiles and their tweets.
//!
//! A profile page needs two upstream calls, the user lookup and the user's
//! tweets. They are issued concurrently and the page fails if either fails.

use log::{info, warn};

use crate::config::is_numeric_id;
use crate::error::{FeedError, FeedResult};
use crate::model::ProfilePage;

use super::api::{
    owned_params, sanitize_for_logging, TwitterClient, PROFILE_USER_FIELDS, TWEET_EXPANSIONS,
    TWEET_FIELDS,
};
use super::normalize::{parse_tweets, profile_from_envelope};
use super::raw::{RawTweetsEnvelope, RawUserEnvelope};

pub(crate) fn profile_params() -> Vec<(String, String)> {
    owned_params(&[
        ("expansions", "pinned_tweet_id"),
        ("tweet.fields", TWEET_FIELDS),
        ("user.fields", PROFILE_USER_FIELDS),
    ])
}

pub(crate) fn user_tweets_params(token: Option<&str>) -> Vec<(String, String)> {
    let mut params = owned_params(&[
        ("expansions", TWEET_EXPANSIONS),
        ("tweet.fields", TWEET_FIELDS),
        ("user.fields", PROFILE_USER_FIELDS),
    ]);
    if let Some(token) = token {
        params.push(("pagination_token".to_string(), token.to_string()));
    }
    params
}

/// Fetches a user's profile together with one page of their tweets.
///
/// # Parameters
///
/// - `id`: Platform id of the user
/// - `token`: Pagination token for the tweets, if any
///
/// # Returns
///
/// - `Ok(ProfilePage)`: An author without tweets yields an empty `tweets` list
/// - `Err(FeedError::InvalidUserId)`: If `id` is not numeric; nothing is sent
/// - `Err(FeedError::ProfileNotFound)`: If the platform knows no such user
/// - `Err(...)`: If either upstream call fails; there is no partial result
pub async fn fetch_profile(
    client: &TwitterClient,
    id: &str,
    token: Option<&str>,
) -> FeedResult<ProfilePage> {
    if !is_numeric_id(id) {
        warn!("Rejecting non-numeric user id '{}'", sanitize_for_logging(id, 64));
        return Err(FeedError::InvalidUserId { id: id.to_string() });
    }
    info!("Fetching profile {} (token: {})", id, token.unwrap_or("<first page>"));

    let profile_path = format!("/2/users/{}", id);
    let tweets_path = format!("/2/users/{}/tweets", id);
    let profile_params = profile_params();
    let tweets_params = user_tweets_params(token);

    let (profile_envelope, tweets_envelope) = tokio::try_join!(
        client.get_signed::<RawUserEnvelope>(&profile_path, &profile_params, "profile"),
        client.get_signed::<RawTweetsEnvelope>(&tweets_path, &tweets_params, "user_tweets"),
    )?;

    let profile = profile_from_envelope(&profile_envelope, id)?;
    let tweets = parse_tweets(&tweets_envelope)?;
    info!("Profile @{} page contains {} tweets", profile.username, tweets.len());

    Ok(ProfilePage {
        profile,
        tweets,
        next_token: tweets_envelope.meta.next_token,
    })
}

/// Fetches the owning account's profile page.
pub async fn fetch_own_profile(client: &TwitterClient, token: Option<&str>) -> FeedResult<ProfilePage> {
    let account_id = client.config().account_id()?.to_string();
    fetch_profile(client, &account_id, token).await
}
