//! Trending topics for the configured location.

use log::{info, warn};
use std::cmp::Reverse;

use crate::error::FeedResult;
use crate::model::{Trend, TrendsResponse};

use super::api::TwitterClient;
use super::raw::{RawTrend, RawTrendLocation};

/// Selects the served fields and sorts by volume, highest first.
///
/// Trends without a reported volume go last; ties keep their upstream order.
pub fn select_trends(raw: Vec<RawTrend>) -> Vec<Trend> {
    let mut trends: Vec<Trend> = raw
        .into_iter()
        .map(|t| Trend {
            name: t.name,
            url: t.url,
            query: t.query,
            tweet_volume: t.tweet_volume,
            promoted_content: t.promoted_content,
        })
        .collect();
    trends.sort_by_key(|t| Reverse(t.tweet_volume));
    trends
}

/// Fetches the current trends snapshot (hashtags excluded).
pub async fn fetch_trends(client: &TwitterClient) -> FeedResult<TrendsResponse> {
    let woeid = client.config().trends_woeid;
    info!("Fetching trends for location {}", woeid);

    let url = client.endpoint(&format!(
        "/1.1/trends/place.json?id={}&exclude=hashtags",
        woeid
    ));
    let locations: Vec<RawTrendLocation> = client.get_bearer(&url, "trends").await?;

    let raw = match locations.into_iter().next() {
        Some(location) => location.trends,
        None => {
            warn!("Trends response for location {} was empty", woeid);
            Vec::new()
        }
    };
    let trends = select_trends(raw);
    info!("Returning {} trends", trends.len());
    Ok(TrendsResponse { trends })
}
