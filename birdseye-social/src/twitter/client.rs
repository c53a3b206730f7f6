//! Wrapper around the Twitter/X v2 API with birdseye defaults.
//!
//! Handles auth, request parameter shaping, cursor pagination, and safe time
//! windows before delegating to the shared HTTP client. List endpoints follow
//! `meta.next_token` until the caller's item budget is filled.
use crate::twitter::extract::{posts_from_page, Post};
use crate::twitter::paginate::collect_items;
use crate::twitter::types::{
    AddRules, DeleteIds, DeleteRules, RuleSpec, RulesResponse, StreamRule, TweetsPage, User,
    UserLookup, UsersPage,
};
use anyhow::Result;
use birdseye_common::BirdseyeError;
use birdseye_http::{Auth, HttpClient, HttpError, RequestOpts};
use std::borrow::Cow;
use time::{Duration, OffsetDateTime};

const TWEET_FIELDS: &str = "created_at,lang,entities,public_metrics,source";
const RULES_PATH: &str = "2/tweets/search/stream/rules";

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    bearer: String,
}

impl TwitterApi {
    pub fn new(bearer_token: String) -> Self {
        let http = HttpClient::new("https://api.twitter.com").expect("twitter base url");
        Self {
            http,
            bearer: bearer_token,
        }
    }

    fn auth_opts(&self) -> RequestOpts<'_> {
        RequestOpts {
            auth: Some(Auth::Bearer(&self.bearer)),
            ..Default::default()
        }
    }

    /// Resolve a username (handle, no `@`) to its platform user record.
    pub async fn lookup_user(&self, username: &str) -> Result<User> {
        let handle = username.trim_start_matches('@');
        let resp: UserLookup = self
            .http
            .get_json(&format!("2/users/by/username/{handle}"), self.auth_opts())
            .await?;
        user_from_lookup(resp, handle)
    }

    /// Posts authored by `user_id`, newest first, up to `limit` items.
    pub async fn user_timeline(
        &self,
        user_id: &str,
        limit: usize,
        page_size: u32,
    ) -> Result<Vec<Post>> {
        self.tweet_pages(format!("2/users/{user_id}/tweets"), limit, page_size)
            .await
    }

    /// The reverse-chronological home timeline of `user_id`.
    pub async fn home_timeline(
        &self,
        user_id: &str,
        limit: usize,
        page_size: u32,
    ) -> Result<Vec<Post>> {
        self.tweet_pages(
            format!("2/users/{user_id}/timelines/reverse_chronological"),
            limit,
            page_size,
        )
        .await
    }

    /// Accounts `user_id` follows, up to `limit` entries.
    pub async fn following(&self, user_id: &str, limit: usize, page_size: u32) -> Result<Vec<User>> {
        let page_size = page_size.clamp(1, 1000);
        let path = format!("2/users/{user_id}/following");
        collect_items(limit, |token| {
            let api = self.clone();
            let path = path.clone();
            async move {
                let mut params: Vec<(&str, Cow<'_, str>)> =
                    vec![("max_results", page_size.to_string().into())];
                if let Some(t) = &token {
                    params.push(("pagination_token", Cow::Owned(t.clone())));
                }
                let page: UsersPage = api
                    .http
                    .get_json(
                        &path,
                        RequestOpts {
                            auth: Some(Auth::Bearer(&api.bearer)),
                            query: Some(params),
                            ..Default::default()
                        },
                    )
                    .await?;
                let next = page.meta.and_then(|m| m.next_token);
                Ok((page.data.unwrap_or_default(), next))
            }
        })
        .await
    }

    /// Paged tweet fetch with authors resolved through `includes.users`,
    /// page by page, before the envelope is discarded.
    async fn tweet_pages(&self, path: String, limit: usize, page_size: u32) -> Result<Vec<Post>> {
        // Timeline endpoints accept 5..=100 per page.
        let page_size = page_size.clamp(5, 100);
        collect_items(limit, |token| {
            let api = self.clone();
            let path = path.clone();
            async move {
                let page = api.fetch_tweets_page(&path, page_size, token).await?;
                let next = page.meta.as_ref().and_then(|m| m.next_token.clone());
                Ok((posts_from_page(page), next))
            }
        })
        .await
    }

    async fn fetch_tweets_page(
        &self,
        path: &str,
        page_size: u32,
        token: Option<String>,
    ) -> Result<TweetsPage> {
        let mut params: Vec<(&str, Cow<'_, str>)> = vec![
            ("max_results", page_size.to_string().into()),
            ("tweet.fields", TWEET_FIELDS.into()),
            ("expansions", "author_id".into()),
        ];
        if let Some(t) = &token {
            params.push(("pagination_token", Cow::Borrowed(t.as_str())));
        }

        let page: TweetsPage = self
            .http
            .get_json(
                path,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.bearer)),
                    query: Some(params),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            path,
            result_count=?page.meta.as_ref().and_then(|m| m.result_count),
            next_token=?page.meta.as_ref().and_then(|m| m.next_token.as_deref()),
            "twitter.page"
        );
        Ok(page)
    }

    /// Search recent posts matching `query`.
    ///
    /// The platform requires the search window to sit fully inside the last
    /// seven days with the end at least ten seconds behind "now", so the
    /// request always uses a compliant window.
    pub async fn recent_search(&self, query: String, max_results: Option<u32>) -> Result<TweetsPage> {
        let max_results = max_results.unwrap_or(100).clamp(10, 100);

        let now = OffsetDateTime::now_utc();
        let end = now - Duration::seconds(20);
        let start = now - Duration::days(7);
        let rfc3339 = &time::format_description::well_known::Rfc3339;

        let params: Vec<(&str, Cow<'_, str>)> = vec![
            ("query", query.into()),
            ("max_results", max_results.to_string().into()),
            ("tweet.fields", TWEET_FIELDS.into()),
            ("expansions", "author_id".into()),
            ("start_time", start.format(rfc3339)?.into()),
            ("end_time", end.format(rfc3339)?.into()),
        ];

        let resp: TweetsPage = self
            .http
            .get_json(
                "2/tweets/search/recent",
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.bearer)),
                    query: Some(params),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await?;

        tracing::debug!(
            result_count=?resp.meta.as_ref().and_then(|m| m.result_count),
            "twitter.search"
        );
        Ok(resp)
    }

    /// Replace the installed filtered-stream rules with one rule per keyword.
    ///
    /// Existing rules are deleted first so repeated runs stay idempotent; this
    /// is the v2 equivalent of the old `track=` keyword list.
    pub async fn replace_stream_rules(&self, keywords: &[String]) -> Result<Vec<StreamRule>> {
        let existing: RulesResponse = self.http.get_json(RULES_PATH, self.auth_opts()).await?;
        let ids: Vec<String> = existing
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.id)
            .collect();

        if !ids.is_empty() {
            tracing::info!(count = ids.len(), "twitter.rules.clearing");
            let _: serde_json::Value = self
                .http
                .post_json(
                    RULES_PATH,
                    &DeleteRules {
                        delete: DeleteIds { ids },
                    },
                    self.auth_opts(),
                )
                .await?;
        }

        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let add = AddRules {
            add: keywords
                .iter()
                .map(|value| RuleSpec {
                    value: value.as_str(),
                    tag: None,
                })
                .collect(),
        };
        let resp: RulesResponse = self
            .http
            .post_json(RULES_PATH, &add, self.auth_opts())
            .await?;
        let installed = resp.data.unwrap_or_default();
        tracing::info!(count = installed.len(), "twitter.rules.installed");
        Ok(installed)
    }

    /// Open the filtered stream and hand back the live response. The caller
    /// owns line framing; see [`crate::twitter::stream`].
    pub async fn open_stream(&self) -> std::result::Result<reqwest::Response, HttpError> {
        let params: Vec<(&str, Cow<'_, str>)> = vec![
            ("tweet.fields", TWEET_FIELDS.into()),
            ("expansions", "author_id".into()),
        ];
        self.http
            .get_stream(
                "2/tweets/search/stream",
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.bearer)),
                    query: Some(params),
                    ..Default::default()
                },
            )
            .await
    }
}

fn user_from_lookup(resp: UserLookup, handle: &str) -> Result<User> {
    match resp.data {
        Some(user) => Ok(user),
        None => Err(BirdseyeError::UserNotFound(handle.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lookup_data_maps_to_user_not_found() {
        let err = user_from_lookup(UserLookup::default(), "ghost").unwrap_err();
        match err.downcast_ref::<BirdseyeError>() {
            Some(BirdseyeError::UserNotFound(handle)) => assert_eq!(handle, "ghost"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lookup_data_passes_through() {
        let resp = UserLookup {
            data: Some(User {
                id: "42".into(),
                username: "alice".into(),
                name: None,
            }),
        };
        assert_eq!(user_from_lookup(resp, "alice").unwrap().id, "42");
    }
}
