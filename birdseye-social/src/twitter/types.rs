use serde::{Deserialize, Serialize};

/// One page of tweets from a timeline, search, or similar list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TweetsPage {
    pub data: Option<Vec<Tweet>>,
    pub includes: Option<Includes>,
    pub meta: Option<Meta>,
}

/// One page of users (e.g. a following list).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UsersPage {
    pub data: Option<Vec<User>>,
    pub meta: Option<Meta>,
}

/// Envelope returned by the single-user lookup endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserLookup {
    pub data: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Meta {
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub result_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Includes {
    #[serde(default)]
    pub users: Option<Vec<User>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,

    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Client application the post was published from.
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub public_metrics: Option<PublicMetrics>,
    #[serde(default)]
    pub entities: Option<Entities>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PublicMetrics {
    pub like_count: Option<u64>,
    #[serde(alias = "retweet_count")]
    pub repost_count: Option<u64>,
    pub reply_count: Option<u64>,
    pub quote_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Entities {
    #[serde(default)]
    pub urls: Option<Vec<UrlEntity>>,
    #[serde(default)]
    pub mentions: Option<Vec<MentionEntity>>,
    #[serde(default)]
    pub hashtags: Option<Vec<HashTag>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlEntity {
    #[serde(default)]
    pub expanded_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionEntity {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashTag {
    pub tag: String,
}

// ==============================
// Filtered stream
// ==============================

/// One event delivered on the filtered stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamEvent {
    pub data: Tweet,
    #[serde(default)]
    pub matching_rules: Option<Vec<MatchingRule>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingRule {
    pub id: String,
    #[serde(default)]
    pub tag: Option<String>,
}

/// A persisted stream rule as the platform reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRule {
    pub id: String,
    pub value: String,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RulesResponse {
    #[serde(default)]
    pub data: Option<Vec<StreamRule>>,
}

/// Body for the rules mutation endpoint: add new rules...
#[derive(Debug, Clone, Serialize)]
pub struct AddRules<'a> {
    pub add: Vec<RuleSpec<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleSpec<'a> {
    pub value: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<&'a str>,
}

/// ...or delete existing ones by id.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRules {
    pub delete: DeleteIds,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteIds {
    pub ids: Vec<String>,
}
