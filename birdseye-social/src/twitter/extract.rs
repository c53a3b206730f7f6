//! Flatten raw API responses into [`Post`] records for analysis.
//!
//! A `Post` is the row shape the analysis crate tabulates: identity, text,
//! resolved author, timestamp, publishing source, and engagement counts.
use crate::twitter::types::{Tweet, TweetsPage, User};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

/// A normalized post, independent of the platform's wire envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub text: String,
    pub author_handle: Option<String>,
    pub author_display_name: Option<String>,
    pub lang: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Client application the post was published from.
    pub source: Option<String>,
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
    pub quote_count: u64,
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    pub urls: Vec<Url>,
}

impl Post {
    /// Canonical status URL: `x.com/<handle>/status/<id>` when the author is
    /// known, the anonymous `/i/web/` form otherwise.
    pub fn status_url(&self) -> Option<Url> {
        let raw = match &self.author_handle {
            Some(h) => format!("https://x.com/{}/status/{}", h, self.id),
            None => format!("https://x.com/i/web/status/{}", self.id),
        };
        Url::parse(&raw).ok()
    }
}

/// Convert a full page, resolving authors through `includes.users`.
pub fn posts_from_page(page: TweetsPage) -> Vec<Post> {
    let users = page
        .includes
        .and_then(|inc| inc.users)
        .unwrap_or_default();
    page.data
        .unwrap_or_default()
        .into_iter()
        .map(|tw| post_from_tweet(tw, &users))
        .collect()
}

pub fn post_from_tweet(tweet: Tweet, users: &[User]) -> Post {
    let author = tweet
        .author_id
        .as_ref()
        .and_then(|aid| users.iter().find(|u| &u.id == aid));

    let created_at = tweet.created_at.as_deref().and_then(|s| {
        OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339).ok()
    });

    let mentions: Vec<String> = tweet
        .entities
        .as_ref()
        .and_then(|e| e.mentions.as_ref())
        .map(|list| list.iter().map(|m| m.username.clone()).collect())
        .unwrap_or_default();

    let hashtags: Vec<String> = tweet
        .entities
        .as_ref()
        .and_then(|e| e.hashtags.as_ref())
        .map(|list| list.iter().map(|h| h.tag.clone()).collect())
        .unwrap_or_default();

    let urls: Vec<Url> = tweet
        .entities
        .as_ref()
        .and_then(|e| e.urls.as_ref())
        .map(|list| {
            list.iter()
                .filter_map(|u| u.expanded_url.as_ref())
                .filter_map(|s| Url::parse(s).ok())
                .collect()
        })
        .unwrap_or_default();

    let metrics = tweet.public_metrics.unwrap_or_default();

    Post {
        id: tweet.id,
        text: tweet.text,
        author_handle: author.map(|u| u.username.clone()),
        author_display_name: author.and_then(|u| u.name.clone()),
        lang: tweet.lang,
        created_at,
        source: tweet.source,
        like_count: metrics.like_count.unwrap_or(0),
        repost_count: metrics.repost_count.unwrap_or(0),
        reply_count: metrics.reply_count.unwrap_or(0),
        quote_count: metrics.quote_count.unwrap_or(0),
        mentions,
        hashtags,
        urls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_resolves_author_and_metrics() {
        let page: TweetsPage = serde_json::from_value(json!({
            "data": [{
                "id": "123",
                "text": "hello",
                "author_id": "42",
                "lang": "en",
                "created_at": "2025-09-01T12:00:00Z",
                "source": "Twitter Web App",
                "entities": {
                    "mentions": [{"username": "bob"}],
                    "hashtags": [{"tag": "naruto"}],
                    "urls": [{"expanded_url": "https://example.com"}]
                },
                "public_metrics": {
                    "like_count": 7,
                    "retweet_count": 3,
                    "reply_count": 2,
                    "quote_count": 0
                }
            }],
            "includes": {
                "users": [{"id": "42", "username": "alice", "name": "Alice"}]
            }
        }))
        .unwrap();

        let posts = posts_from_page(page);
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.id, "123");
        assert_eq!(post.author_handle.as_deref(), Some("alice"));
        assert_eq!(post.author_display_name.as_deref(), Some("Alice"));
        assert_eq!(post.like_count, 7);
        assert_eq!(post.repost_count, 3);
        assert_eq!(post.mentions, vec!["bob"]);
        assert_eq!(post.hashtags, vec!["naruto"]);
        assert_eq!(post.urls.len(), 1);
        assert_eq!(
            post.status_url().unwrap().as_str(),
            "https://x.com/alice/status/123"
        );
        assert!(post.created_at.is_some());
    }

    #[test]
    fn extract_tolerates_sparse_tweets() {
        let page: TweetsPage = serde_json::from_value(json!({
            "data": [{"id": "9", "text": "bare"}]
        }))
        .unwrap();

        let posts = posts_from_page(page);
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert_eq!(post.like_count, 0);
        assert!(post.author_handle.is_none());
        assert!(post.created_at.is_none());
        assert_eq!(
            post.status_url().unwrap().as_str(),
            "https://x.com/i/web/status/9"
        );
    }
}
