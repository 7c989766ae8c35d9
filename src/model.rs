//! UI-facing value objects.
//!
//! These are the self-contained shapes returned by every endpoint. They carry
//! no references into side-tables: authors and referenced tweets are embedded.
//! Optional fields are omitted from the JSON when absent, and `urls` /
//! `mentions` are never serialized as empty arrays.

use serde::{Deserialize, Serialize};

/// Engagement counters of a tweet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetMetrics {
    pub retweet_count: u64,
    pub quote_count: u64,
    pub like_count: u64,
    pub reply_count: u64,
}

impl TweetMetrics {
    /// Sum of all four counters, used for search ranking. Saturates at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.retweet_count
            .saturating_add(self.quote_count)
            .saturating_add(self.like_count)
            .saturating_add(self.reply_count)
    }
}

/// Audience counters of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetrics {
    pub followers_count: u64,
    pub following_count: u64,
    pub tweet_count: u64,
}

/// Author of a tweet, embedded by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub username: String,
    pub name: String,
    pub verified: bool,
    pub protected: bool,
    pub metrics: UserMetrics,
}

/// A mention span. `start..end` is a half-open offset range into the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub start: usize,
    pub end: usize,
    pub username: String,
    pub id: String,
}

/// A link contained in a tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntity {
    /// The short `t.co` form that appears in the text
    pub url: String,
    pub expanded_url: String,
    pub display_url: String,
}

/// How a tweet relates to the tweet it embeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    Quoted,
    Retweeted,
}

/// The fields every normalized tweet carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetBody {
    pub id: String,
    pub created_at: String,
    pub text: String,
    pub conversation_id: String,
    pub reply_setting: String,
    pub metrics: TweetMetrics,
    pub author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<Mention>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<UrlEntity>>,
}

/// A quoted or retweeted tweet embedded in another tweet.
///
/// It holds a [`TweetBody`], not a [`Tweet`], so nesting stops at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencedTweet {
    pub reference_type: ReferenceType,
    #[serde(flatten)]
    pub tweet: TweetBody,
}

/// A normalized tweet as served to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(flatten)]
    pub body: TweetBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_tweet: Option<ReferencedTweet>,
}

impl Tweet {
    /// The tweet whose author, metrics and text should be displayed.
    ///
    /// For a retweet this is the retweeted original; otherwise the tweet itself.
    pub fn canonical(&self) -> &TweetBody {
        match &self.referenced_tweet {
            Some(r) if r.reference_type == ReferenceType::Retweeted => &r.tweet,
            _ => &self.body,
        }
    }

    pub fn reference_type(&self) -> Option<ReferenceType> {
        self.referenced_tweet.as_ref().map(|r| r.reference_type)
    }
}

/// Link shown in a profile bio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioUrl {
    pub expanded_url: String,
    pub display_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bio {
    pub description: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<BioUrl>,
}

/// A user profile with an optional pinned tweet.
///
/// `Profile::default()` is the "not yet loaded" sentinel: empty id, zero counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub username: String,
    pub name: String,
    pub verified: bool,
    pub protected: bool,
    pub metrics: UserMetrics,
    pub bio: Bio,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_tweet: Option<Tweet>,
}

impl Profile {
    /// The "not yet loaded" sentinel.
    pub fn empty() -> Self {
        Profile::default()
    }

    pub fn is_loaded(&self) -> bool {
        !self.id.is_empty()
    }

    /// The profile owner as an embeddable tweet author.
    pub fn as_author(&self) -> Author {
        Author {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
            verified: self.verified,
            protected: self.protected,
            metrics: self.metrics,
        }
    }
}

/// A trending topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub name: String,
    pub url: String,
    pub query: String,
    /// `None` when the platform does not report a volume
    pub tweet_volume: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_content: Option<String>,
}

// =============================================================================
// Response envelopes
// =============================================================================

/// `GET /timeline` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePage {
    pub tweets: Vec<Tweet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// `GET /trends` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendsResponse {
    pub trends: Vec<Trend>,
}

/// `GET /tweets/search/:query` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tweets: Vec<Tweet>,
}

/// `GET /users/:id` and `GET /users/me` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePage {
    pub profile: Profile,
    pub tweets: Vec<Tweet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
