//! Presentation helpers for normalized tweets.
//!
//! These produce display-ready pieces for a UI: compact counters and a tweet's
//! text split into plain text, mentions and links.

use serde::Serialize;

use crate::model::TweetBody;

/// Formats a counter compactly: `1.5K`, `250K`, `3.20M`.
pub fn format_number(n: u64) -> String {
    let value = n as f64;
    if n > 1_000_000 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if n > 100_000 {
        format!("{:.0}K", value / 1_000.0)
    } else if n > 1_000 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        n.to_string()
    }
}

/// One display piece of a tweet's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextSegment {
    Text { text: String },
    Mention { text: String, id: String },
    Link { href: String, label: String },
}

/// Splits a tweet's text into display segments.
///
/// Mention spans are applied to the original text (offsets count Unicode
/// scalar values). Short links listed in `urls` are removed from plain text and
/// re-emitted as trailing [`TextSegment::Link`]s, but only for links that occur
/// in the text. `&amp;` is decoded and newlines dropped in plain text.
pub fn segment_text(tweet: &TweetBody) -> Vec<TextSegment> {
    let chars: Vec<char> = tweet.text.chars().collect();
    let slice = |start: usize, end: usize| -> String {
        let end = end.min(chars.len());
        let start = start.min(end);
        chars[start..end].iter().collect()
    };
    let short_links: Vec<&str> = tweet
        .urls
        .iter()
        .flatten()
        .map(|u| u.url.as_str())
        .collect();

    let mut segments = Vec::new();
    let push_text = |segments: &mut Vec<TextSegment>, raw: String| {
        let mut text = raw.replace("&amp;", "&").replace('\n', "");
        for link in &short_links {
            text = text.replace(*link, "");
        }
        if !text.is_empty() {
            segments.push(TextSegment::Text { text });
        }
    };

    let mut cursor = 0;
    for mention in tweet.mentions.iter().flatten() {
        if mention.start < cursor || mention.end <= mention.start {
            continue;
        }
        push_text(&mut segments, slice(cursor, mention.start));
        segments.push(TextSegment::Mention {
            text: slice(mention.start, mention.end),
            id: mention.id.clone(),
        });
        cursor = mention.end;
    }
    push_text(&mut segments, slice(cursor, chars.len()));

    segments.extend(
        tweet
            .urls
            .iter()
            .flatten()
            .filter(|u| tweet.text.contains(&u.url))
            .map(|u| TextSegment::Link {
                href: u.expanded_url.clone(),
                label: u.display_url.clone(),
            }),
    );
    segments
}
