//! The in-memory post table: one row per post plus derived columns.
//!
//! Mirrors what a dataframe would hold: text, id, length, timestamp, source,
//! like count, repost count, and the derived sentiment sign. Aggregates and
//! metric time series are computed on demand; nothing here persists.
use crate::sentiment::SentimentAnalyzer;
use birdseye_social::twitter::extract::Post;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One tabulated post with its derived columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRow {
    pub id: String,
    pub text: String,
    /// Character count of the original text.
    pub len: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    pub source: Option<String>,
    pub likes: u64,
    pub reposts: u64,
    /// Sentiment sign: -1, 0, or 1.
    pub sentiment: i8,
}

/// Numeric column a time series can be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Len,
    Likes,
    Reposts,
    Sentiment,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Self::Len => "len",
            Self::Likes => "likes",
            Self::Reposts => "reposts",
            Self::Sentiment => "sentiment",
        }
    }

    fn of(self, row: &PostRow) -> f64 {
        match self {
            Self::Len => row.len as f64,
            Self::Likes => row.likes as f64,
            Self::Reposts => row.reposts as f64,
            Self::Sentiment => row.sentiment as f64,
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "len" | "length" => Ok(Self::Len),
            "likes" => Ok(Self::Likes),
            "reposts" | "retweets" => Ok(Self::Reposts),
            "sentiment" => Ok(Self::Sentiment),
            other => Err(format!(
                "unknown metric: {other} (expected len, likes, reposts, or sentiment)"
            )),
        }
    }
}

/// Rows-by-columns view over a batch of posts.
#[derive(Debug, Clone, Default)]
pub struct PostFrame {
    rows: Vec<PostRow>,
}

impl PostFrame {
    /// Tabulate `posts`, scoring each text with `analyzer`.
    pub fn from_posts(posts: &[Post], analyzer: &SentimentAnalyzer) -> Self {
        let rows = posts
            .iter()
            .map(|post| PostRow {
                id: post.id.clone(),
                text: post.text.clone(),
                len: post.text.chars().count(),
                created_at: post.created_at,
                source: post.source.clone(),
                likes: post.like_count,
                reposts: post.repost_count,
                sentiment: analyzer.sign(&post.text).value(),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[PostRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Average text length over all rows.
    pub fn mean_len(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.rows.iter().map(|r| r.len as f64).sum::<f64>() / self.rows.len() as f64
    }

    pub fn max_likes(&self) -> Option<u64> {
        self.rows.iter().map(|r| r.likes).max()
    }

    pub fn max_reposts(&self) -> Option<u64> {
        self.rows.iter().map(|r| r.reposts).max()
    }

    /// Share of rows per sentiment sign as (negative, neutral, positive).
    pub fn sentiment_breakdown(&self) -> (usize, usize, usize) {
        let mut counts = (0usize, 0usize, 0usize);
        for row in &self.rows {
            match row.sentiment {
                s if s < 0 => counts.0 += 1,
                0 => counts.1 += 1,
                _ => counts.2 += 1,
            }
        }
        counts
    }

    /// Metric values ordered by timestamp; rows without a timestamp are
    /// dropped from the series.
    pub fn series(&self, metric: Metric) -> Vec<(OffsetDateTime, f64)> {
        let mut points: Vec<(OffsetDateTime, f64)> = self
            .rows
            .iter()
            .filter_map(|r| r.created_at.map(|t| (t, metric.of(r))))
            .collect();
        points.sort_by_key(|(t, _)| *t);
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn post(id: &str, text: &str, likes: u64, reposts: u64, at: Option<OffsetDateTime>) -> Post {
        Post {
            id: id.into(),
            text: text.into(),
            author_handle: None,
            author_display_name: None,
            lang: Some("en".into()),
            created_at: at,
            source: Some("Twitter Web App".into()),
            like_count: likes,
            repost_count: reposts,
            reply_count: 0,
            quote_count: 0,
            mentions: Vec::new(),
            hashtags: Vec::new(),
            urls: Vec::new(),
        }
    }

    fn sample() -> Vec<Post> {
        vec![
            post(
                "1",
                "what a great day",
                10,
                2,
                Some(datetime!(2025-08-01 10:00 UTC)),
            ),
            post(
                "2",
                "this is terrible",
                4,
                8,
                Some(datetime!(2025-08-01 09:00 UTC)),
            ),
            post("3", "just a post", 7, 1, None),
        ]
    }

    #[test]
    fn derived_columns_match_hand_computed_values() {
        let frame = PostFrame::from_posts(&sample(), &SentimentAnalyzer::new());

        assert_eq!(frame.len(), 3);
        let rows = frame.rows();
        assert_eq!(rows[0].len, "what a great day".chars().count());
        assert_eq!(rows[0].sentiment, 1);
        assert_eq!(rows[1].sentiment, -1);
        assert_eq!(rows[2].sentiment, 0);

        // (16 + 16 + 11) / 3
        assert!((frame.mean_len() - 43.0 / 3.0).abs() < 1e-9);
        assert_eq!(frame.max_likes(), Some(10));
        assert_eq!(frame.max_reposts(), Some(8));
        assert_eq!(frame.sentiment_breakdown(), (1, 1, 1));
    }

    #[test]
    fn series_sorts_by_time_and_skips_undated_rows() {
        let frame = PostFrame::from_posts(&sample(), &SentimentAnalyzer::new());
        let series = frame.series(Metric::Likes);

        assert_eq!(series.len(), 2);
        // Row "2" is earlier, so it comes first despite insertion order.
        assert_eq!(series[0].1, 4.0);
        assert_eq!(series[1].1, 10.0);
    }

    #[test]
    fn empty_frame_aggregates_are_defined() {
        let frame = PostFrame::from_posts(&[], &SentimentAnalyzer::new());
        assert!(frame.is_empty());
        assert_eq!(frame.mean_len(), 0.0);
        assert_eq!(frame.max_likes(), None);
        assert!(frame.series(Metric::Len).is_empty());
    }
}
