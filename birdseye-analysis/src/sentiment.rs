//! Text cleaning and lexicon-based sentiment scoring.
//!
//! Polarity is a continuous score in [-1, 1] computed from a small valence
//! lexicon over the cleaned text, then thresholded into a three-way sign.
//! Deliberately simple: token-level word matching, no negation handling.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static MENTION_OR_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(@\w+)|(\w+://\S+)").expect("mention/url regex"));
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z\s]").expect("noise regex"));

/// Strip @mentions, URLs, and punctuation noise, then collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let stripped = MENTION_OR_URL.replace_all(text, " ");
    let stripped = NOISE.replace_all(&stripped, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Three-way sentiment sign derived from continuous polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentSign {
    Negative,
    Neutral,
    Positive,
}

impl SentimentSign {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > 0.0 {
            Self::Positive
        } else if polarity < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// The sign as the -1/0/1 column value used in tabular output.
    pub fn value(self) -> i8 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }
}

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "love", "loved", "best", "awesome", "amazing", "happy",
    "win", "winning", "wonderful", "excellent", "nice", "fantastic", "cool",
    "fun", "beautiful", "perfect", "brilliant", "success", "enjoy", "enjoyed",
    "favorite", "favourite", "excited", "glad", "thanks", "thank",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "worst", "hate", "hated", "awful", "terrible", "horrible", "sad",
    "lose", "losing", "lost", "fail", "failed", "failure", "angry", "annoying",
    "boring", "broken", "wrong", "ugly", "stupid", "disappointing",
    "disappointed", "sucks", "poor", "crisis", "disaster",
];

/// Scores cleaned text against the valence lexicon.
#[derive(Debug, Default, Clone)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Continuous polarity in [-1, 1]: matched valence sum over matched
    /// word count, 0 when nothing in the text carries valence.
    pub fn polarity(&self, text: &str) -> f64 {
        let cleaned = clean_text(text).to_lowercase();

        let mut score = 0.0f64;
        let mut matched = 0.0f64;
        for word in cleaned.split_whitespace() {
            if POSITIVE_WORDS.contains(&word) {
                score += 1.0;
                matched += 1.0;
            } else if NEGATIVE_WORDS.contains(&word) {
                score -= 1.0;
                matched += 1.0;
            }
        }

        if matched > 0.0 {
            (score / matched).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn sign(&self, text: &str) -> SentimentSign {
        SentimentSign::from_polarity(self.polarity(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_mentions_urls_and_noise() {
        let raw = "@alice check this out!! https://t.co/abc123 so cool :) #rust";
        assert_eq!(clean_text(raw), "check this out so cool rust");
    }

    #[test]
    fn clean_of_pure_noise_is_empty() {
        assert_eq!(clean_text("@bob https://x.com/y ..."), "");
    }

    #[test]
    fn polarity_sign_thresholds() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.sign("what a great and wonderful day"), SentimentSign::Positive);
        assert_eq!(analyzer.sign("this is the worst, I hate it"), SentimentSign::Negative);
        assert_eq!(analyzer.sign("the sky is above the ground"), SentimentSign::Neutral);
    }

    #[test]
    fn mixed_valence_cancels_to_neutral() {
        let analyzer = SentimentAnalyzer::new();
        assert_eq!(analyzer.sign("good day, bad night"), SentimentSign::Neutral);
        assert_eq!(analyzer.polarity("good day, bad night"), 0.0);
    }

    #[test]
    fn sign_values_match_column_encoding() {
        assert_eq!(SentimentSign::Negative.value(), -1);
        assert_eq!(SentimentSign::Neutral.value(), 0);
        assert_eq!(SentimentSign::Positive.value(), 1);
    }

    #[test]
    fn mentions_do_not_contribute_valence() {
        let analyzer = SentimentAnalyzer::new();
        // "@best_fan" would read as positive if mentions leaked through.
        assert_eq!(analyzer.sign("@best_fan hello there"), SentimentSign::Neutral);
    }
}
