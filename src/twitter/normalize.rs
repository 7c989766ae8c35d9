//! Tweet-graph normalization.
//!
//! The platform returns tweets with foreign keys (`author_id`,
//! `referenced_tweets[].id`) into `includes` side-tables. This module resolves
//! those references eagerly and produces self-contained [`Tweet`] and
//! [`Profile`] values.

use log::{debug, warn};
use std::collections::HashMap;

use crate::error::{FeedError, FeedResult};
use crate::model::{
    Author, Bio, BioUrl, Mention, Profile, ReferenceType, ReferencedTweet, Tweet, TweetBody,
    TweetMetrics, UrlEntity, UserMetrics,
};

use super::parsing::strip_quote_link;
use super::raw::{
    RawIncludes, RawReference, RawReferenceType, RawTweet, RawTweetsEnvelope, RawUser,
    RawUserEnvelope,
};

/// Id-indexed view over an envelope's `includes`.
#[derive(Debug)]
pub struct SideTables<'a> {
    users: HashMap<&'a str, &'a RawUser>,
    tweets: HashMap<&'a str, &'a RawTweet>,
}

impl<'a> SideTables<'a> {
    pub fn new(includes: &'a RawIncludes) -> Self {
        SideTables {
            users: includes.users.iter().map(|u| (u.id.as_str(), u)).collect(),
            tweets: includes.tweets.iter().map(|t| (t.id.as_str(), t)).collect(),
        }
    }

    fn user(&self, id: &str) -> FeedResult<&'a RawUser> {
        self.users
            .get(id)
            .copied()
            .ok_or_else(|| FeedError::MissingUser { id: id.to_string() })
    }

    fn tweet(&self, id: &str) -> FeedResult<&'a RawTweet> {
        self.tweets
            .get(id)
            .copied()
            .ok_or_else(|| FeedError::MissingTweet { id: id.to_string() })
    }
}

/// Normalizes every tweet of a tweet-list envelope, preserving order.
///
/// # Returns
///
/// - `Ok(Vec<Tweet>)`: One normalized tweet per element of `data`
/// - `Err(FeedError::MissingUser | FeedError::MissingTweet)`: If any tweet
///   references an id that is absent from `includes`; the whole page fails
pub fn parse_tweets(envelope: &RawTweetsEnvelope) -> FeedResult<Vec<Tweet>> {
    let tables = SideTables::new(&envelope.includes);
    let tweets = envelope
        .data
        .iter()
        .map(|raw| {
            normalize_tweet(raw, &tables).map_err(|e| {
                warn!("Failed to normalize tweet {}: {}", raw.id, e);
                e
            })
        })
        .collect::<FeedResult<Vec<_>>>()?;
    debug!("Normalized {} tweets", tweets.len());
    Ok(tweets)
}

/// Normalizes one raw tweet against the envelope's side-tables.
pub fn normalize_tweet(raw: &RawTweet, tables: &SideTables<'_>) -> FeedResult<Tweet> {
    let author = author_from(tables.user(&raw.author_id)?);

    let Some((reference_type, reference)) = reference_of_interest(raw) else {
        return Ok(Tweet {
            body: tweet_body(raw, author),
            referenced_tweet: None,
        });
    };

    let referenced_raw = tables.tweet(&reference.id)?;
    let referenced_author = author_from(tables.user(&referenced_raw.author_id)?);
    let referenced = ReferencedTweet {
        reference_type,
        tweet: tweet_body(referenced_raw, referenced_author),
    };

    let mut body = tweet_body(raw, author);
    if reference_type == ReferenceType::Quoted {
        let (text, link) = strip_quote_link(&body.text);
        body.text = text;
        if let Some(link) = link {
            body.urls = body
                .urls
                .map(|urls| urls.into_iter().filter(|u| u.url != link).collect::<Vec<_>>())
                .and_then(non_empty);
        }
    }

    Ok(Tweet {
        body,
        referenced_tweet: Some(referenced),
    })
}

/// The first quote or retweet reference. Replies are not embedded.
fn reference_of_interest(raw: &RawTweet) -> Option<(ReferenceType, &RawReference)> {
    raw.referenced_tweets.iter().find_map(|r| match r.kind {
        RawReferenceType::Quoted => Some((ReferenceType::Quoted, r)),
        RawReferenceType::Retweeted => Some((ReferenceType::Retweeted, r)),
        RawReferenceType::RepliedTo | RawReferenceType::Other => None,
    })
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn tweet_body(raw: &RawTweet, author: Author) -> TweetBody {
    let urls = raw.entities.urls.as_ref().and_then(|urls| {
        non_empty(
            urls.iter()
                .map(|u| UrlEntity {
                    url: u.url.clone(),
                    expanded_url: u.expanded_url.clone(),
                    display_url: u.display_url.clone(),
                })
                .collect(),
        )
    });
    let mentions = raw.entities.mentions.as_ref().and_then(|mentions| {
        non_empty(
            mentions
                .iter()
                .map(|m| Mention {
                    start: m.start,
                    end: m.end,
                    username: m.username.clone(),
                    id: m.id.clone(),
                })
                .collect(),
        )
    });

    TweetBody {
        id: raw.id.clone(),
        created_at: raw.created_at.clone(),
        text: raw.text.clone(),
        conversation_id: raw.conversation_id.clone(),
        reply_setting: raw.reply_settings.clone(),
        metrics: TweetMetrics {
            retweet_count: raw.public_metrics.retweet_count,
            quote_count: raw.public_metrics.quote_count,
            like_count: raw.public_metrics.like_count,
            reply_count: raw.public_metrics.reply_count,
        },
        author,
        mentions,
        urls,
    }
}

fn user_metrics(user: &RawUser) -> UserMetrics {
    UserMetrics {
        followers_count: user.public_metrics.followers_count,
        following_count: user.public_metrics.following_count,
        tweet_count: user.public_metrics.tweet_count,
    }
}

fn author_from(user: &RawUser) -> Author {
    Author {
        id: user.id.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        verified: user.verified,
        protected: user.protected,
        metrics: user_metrics(user),
    }
}

/// Builds a profile from a raw user and an optional pinned tweet.
///
/// The pinned tweet's author is the profile owner; no side-table lookup is
/// involved and it never embeds a referenced tweet.
pub fn build_profile(user: &RawUser, pinned: Option<&RawTweet>) -> Profile {
    let bio_url = user
        .entities
        .url
        .as_ref()
        .and_then(|group| group.urls.first())
        .map(|u| BioUrl {
            expanded_url: u.expanded_url.clone(),
            display_url: u.display_url.clone(),
        });
    let location = user.location.clone().filter(|l| !l.is_empty());

    let mut profile = Profile {
        id: user.id.clone(),
        username: user.username.clone(),
        name: user.name.clone(),
        verified: user.verified,
        protected: user.protected,
        metrics: user_metrics(user),
        bio: Bio {
            description: user.description.clone(),
            created_at: user.created_at.clone(),
            location,
            url: bio_url,
        },
        pinned_tweet: None,
    };

    let owner = profile.as_author();
    profile.pinned_tweet = pinned.map(|raw| Tweet {
        body: tweet_body(raw, owner),
        referenced_tweet: None,
    });
    profile
}

/// Builds a profile from the user-lookup envelope.
///
/// # Returns
///
/// - `Ok(Profile)`: With the pinned tweet taken from `includes.tweets`
/// - `Err(FeedError::ProfileNotFound)`: If the envelope carries no user
pub fn profile_from_envelope(envelope: &RawUserEnvelope, requested_id: &str) -> FeedResult<Profile> {
    let user = envelope
        .data
        .as_ref()
        .ok_or_else(|| FeedError::ProfileNotFound {
            id: requested_id.to_string(),
        })?;
    let pinned = envelope.includes.tweets.first();
    Ok(build_profile(user, pinned))
}
