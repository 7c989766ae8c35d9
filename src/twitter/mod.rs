//! Twitter/X API integration module.
//!
//! This module contains the upstream client, the raw response shapes, the
//! normalization of tweets and profiles, and one orchestrator per endpoint.

mod api;
mod normalize;
mod parsing;
pub mod raw;
mod search;
mod timeline;
mod trends;
mod users;

// Re-export public API
pub use api::TwitterClient;
pub use normalize::{build_profile, normalize_tweet, parse_tweets, profile_from_envelope, SideTables};
pub use parsing::strip_quote_link;
pub use search::{build_search_query, rank_tweets, search_tweets, RANKED_LIMIT, SEARCH_OPERATORS};
pub use timeline::fetch_timeline;
pub use trends::{fetch_trends, select_trends};
pub use users::{fetch_own_profile, fetch_profile};
