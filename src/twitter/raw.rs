//! Raw Twitter API v2 / v1.1 response shapes.
//!
//! Only the fields the normalizer reads are declared; everything else in the
//! upstream JSON is ignored. Missing arrays and objects deserialize to their
//! defaults so that sparse envelopes (for example a user with no tweets) parse.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTweetMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub quote_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub reply_count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserMetrics {
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub following_count: u64,
    #[serde(default)]
    pub tweet_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUrl {
    pub url: String,
    #[serde(default)]
    pub expanded_url: String,
    #[serde(default)]
    pub display_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMention {
    pub start: usize,
    pub end: usize,
    pub username: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTweetEntities {
    pub urls: Option<Vec<RawUrl>>,
    pub mentions: Option<Vec<RawMention>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawReferenceType {
    Quoted,
    Retweeted,
    RepliedTo,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReference {
    #[serde(rename = "type")]
    pub kind: RawReferenceType,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTweet {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub conversation_id: String,
    #[serde(default)]
    pub reply_settings: String,
    #[serde(default)]
    pub public_metrics: RawTweetMetrics,
    #[serde(default)]
    pub entities: RawTweetEntities,
    #[serde(default)]
    pub referenced_tweets: Vec<RawReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUrlGroup {
    #[serde(default)]
    pub urls: Vec<RawUrl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserEntities {
    /// Links of the profile's website field
    pub url: Option<RawUrlGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub public_metrics: RawUserMetrics,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    pub location: Option<String>,
    #[serde(default)]
    pub entities: RawUserEntities,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIncludes {
    #[serde(default)]
    pub users: Vec<RawUser>,
    #[serde(default)]
    pub tweets: Vec<RawTweet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeta {
    pub next_token: Option<String>,
    #[serde(default)]
    pub result_count: u64,
}

/// Envelope of the tweet-list endpoints (timeline, user tweets, search).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTweetsEnvelope {
    #[serde(default)]
    pub data: Vec<RawTweet>,
    #[serde(default)]
    pub includes: RawIncludes,
    #[serde(default)]
    pub meta: RawMeta,
}

/// Envelope of the single-user lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUserEnvelope {
    pub data: Option<RawUser>,
    #[serde(default)]
    pub includes: RawIncludes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTrend {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub query: String,
    pub tweet_volume: Option<u64>,
    pub promoted_content: Option<String>,
}

/// One element of the v1.1 `trends/place.json` array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrendLocation {
    #[serde(default)]
    pub trends: Vec<RawTrend>,
}
