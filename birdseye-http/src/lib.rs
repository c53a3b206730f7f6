//! Minimal HTTP client with safe logging, retries, and flexible auth.
//!
//! - Request options: headers, `Auth`, query params, timeout, retries
//! - Redacts sensitive query params and never logs secret values
//! - Retries 429/5xx with exponential backoff and `Retry-After` support
//! - `get_stream` hands back the raw response for long-lived connections
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), birdseye_http::HttpError> {
//! let client = birdseye_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", birdseye_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Security: `Auth::Bearer` values are sanitized before use, and logs only
//! ever include the auth kind (bearer/header/query/none), not the secret.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

impl HttpError {
    /// Status code of the failing response, when the server got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ==============================
// Auth & request options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    /// Custom header auth.
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    /// Auth via query param.
    Query { name: &'a str, value: Cow<'a, str> },
    None,
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use birdseye_http::{Auth, RequestOpts};
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     retries: Some(1),
///     auth: Some(Auth::Bearer("token")),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub retries: Option<usize>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
    pub max_retries: usize,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use birdseye_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// assert_eq!(client.max_retries, 2);
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
            max_retries: 2,
        })
    }

    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// GET JSON with per-request options (headers/query/auth/timeout/retries).
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json::<(), T>(Method::GET, path, None, opts)
            .await
    }

    /// POST JSON with per-request options.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request_json(Method::POST, path, Some(body), opts)
            .await
    }

    /// Open a GET request and return the live [`Response`] without reading
    /// the body, so callers can consume `bytes_stream()` for as long as the
    /// server keeps the connection up. No retries and no overall timeout are
    /// applied; a long-lived stream outlives any sane request deadline.
    pub async fn get_stream(
        &self,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<Response, HttpError> {
        let url = self.join(path)?;
        let mut rb = self.inner.request(Method::GET, url.clone());

        let mut query = opts.query.clone();
        rb = apply_auth(rb, opts.auth.as_ref(), &mut query)?;
        if let Some(q) = &query {
            let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }
        if let Some(hdrs) = &opts.headers {
            rb = rb.headers(hdrs.clone());
        }

        tracing::debug!(
            host_path=%format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            auth_kind=auth_kind(opts.auth.as_ref()),
            "http.stream.open"
        );

        let resp = rb
            .send()
            .await
            .map_err(|e| HttpError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let request_id = header_str(resp.headers(), "x-request-id").to_string();
            let bytes = resp.bytes().await.unwrap_or_default();
            let message = extract_error_message(&bytes);
            tracing::warn!(%status, message=%message, "http.stream.error");
            return Err(HttpError::Api {
                status,
                message,
                request_id,
            });
        }

        tracing::info!(%status, "http.stream.connected");
        Ok(resp)
    }

    fn join(&self, path: &str) -> Result<Url, HttpError> {
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn request_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.join(path)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);
        let max_retries = opts.retries.unwrap_or(self.max_retries);
        let mut attempt = 0usize;

        loop {
            let mut rb = self.inner.request(method.clone(), url.clone()).timeout(timeout);

            let mut query = opts.query.clone();
            rb = apply_auth(rb, opts.auth.as_ref(), &mut query)?;
            if let Some(q) = &query {
                let pairs: Vec<(&str, &str)> = q.iter().map(|(k, v)| (*k, v.as_ref())).collect();
                rb = rb.query(&pairs);
            }
            if let Some(b) = body {
                rb = rb.json(b);
            }
            if let Some(hdrs) = &opts.headers {
                rb = rb.headers(hdrs.clone());
            }

            tracing::debug!(
                attempt = attempt + 1,
                max_retries,
                method=%method,
                host_path=%format!("{}{}", url.domain().unwrap_or("-"), url.path()),
                query=?redact_query(query.as_deref()),
                timeout_ms=timeout.as_millis() as u64,
                auth_kind=auth_kind(opts.auth.as_ref()),
                has_body=%body.is_some(),
                "http.request.start"
            );

            let t0 = std::time::Instant::now();
            let outcome = match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    let headers = resp.headers().clone();
                    match resp.bytes().await {
                        Ok(bytes) => Ok((status, headers, bytes)),
                        Err(e) => Err(e.to_string()),
                    }
                }
                Err(e) => Err(e.to_string()),
            };

            let (status, headers, bytes) = match outcome {
                Ok(parts) => parts,
                Err(message) => {
                    if attempt < max_retries {
                        attempt += 1;
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            attempt,
                            max_retries,
                            backoff_ms = delay.as_millis() as u64,
                            message=%message,
                            "http.retrying.network"
                        );
                        sleep(delay).await;
                        continue;
                    }
                    return Err(HttpError::Network(message));
                }
            };

            let request_id = header_str(&headers, "x-request-id").to_string();
            tracing::debug!(
                %status,
                duration_ms = t0.elapsed().as_millis() as u64,
                body_len = bytes.len(),
                x_request_id=%request_id,
                rate_limit_remaining=?header_str_opt(&headers, "x-rate-limit-remaining"),
                rate_limit_reset=?header_str_opt(&headers, "x-rate-limit-reset"),
                "http.response"
            );

            let snippet = snip_body(&bytes);

            if status.is_success() {
                return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                    tracing::warn!(
                        serde_err=%e.to_string(),
                        body_snippet=%snippet,
                        "http.response.decode_error"
                    );
                    HttpError::Decode(e.to_string(), snippet)
                });
            }

            let message = extract_error_message(&bytes);
            let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < max_retries {
                attempt += 1;
                let delay = match retry_after_delay_secs(&headers) {
                    Some(secs) => Duration::from_secs(secs),
                    None if status == StatusCode::TOO_MANY_REQUESTS => {
                        backoff_delay(attempt).max(Duration::from_millis(1100))
                    }
                    None => backoff_delay(attempt),
                };
                tracing::warn!(
                    %status,
                    attempt,
                    max_retries,
                    backoff_ms = delay.as_millis() as u64,
                    message=%message,
                    "http.retrying"
                );
                sleep(delay).await;
                continue;
            }

            tracing::warn!(
                %status,
                message=%message,
                x_request_id=%request_id,
                body_snippet=%snippet,
                "http.error"
            );
            return Err(HttpError::Api {
                status,
                message,
                request_id,
            });
        }
    }
}

// ==============================
// Helpers
// ==============================

fn apply_auth<'a>(
    rb: reqwest::RequestBuilder,
    auth: Option<&Auth<'a>>,
    query: &mut Option<Vec<(&'a str, Cow<'a, str>)>>,
) -> Result<reqwest::RequestBuilder, HttpError> {
    Ok(match auth {
        Some(Auth::Bearer(tok)) => rb.bearer_auth(sanitize_api_key(tok)?),
        Some(Auth::Header { name, value }) => rb.header(name, value),
        Some(Auth::Query { name, value }) => {
            query
                .get_or_insert_with(Vec::new)
                .push((*name, value.clone()));
            rb
        }
        Some(Auth::None) | None => rb,
    })
}

fn auth_kind(auth: Option<&Auth<'_>>) -> &'static str {
    match auth {
        Some(Auth::Bearer(_)) => "bearer",
        Some(Auth::Header { .. }) => "header",
        Some(Auth::Query { .. }) => "query",
        Some(Auth::None) | None => "none",
    }
}

fn backoff_delay(attempt: usize) -> Duration {
    Duration::from_millis(200u64.saturating_mul(1 << (attempt - 1)))
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> &'h str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

fn header_str_opt<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn redact_query(query: Option<&[(&str, Cow<'_, str>)]>) -> Vec<(String, String)> {
    query
        .map(|q| {
            q.iter()
                .map(|(k, v)| {
                    let secret = matches!(
                        k.to_ascii_lowercase().as_str(),
                        "access_token"
                            | "authorization"
                            | "auth"
                            | "key"
                            | "api_key"
                            | "token"
                            | "secret"
                            | "client_secret"
                            | "bearer"
                    );
                    (
                        (*k).to_string(),
                        if secret {
                            "<redacted>".to_string()
                        } else {
                            v.as_ref().to_string()
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn retry_after_delay_secs(h: &HeaderMap) -> Option<u64> {
    h.get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())?
        .parse()
        .ok()
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

/// Pull a human-readable message out of a platform error body.
fn extract_error_message(body: &[u8]) -> String {
    // Twitter v2: {"errors":[{"message":"...", "detail":"...", "title":"..."}]}
    #[derive(Deserialize)]
    struct TwErrors {
        errors: Vec<TwErr>,
    }
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct TwErr {
        message: String,
        detail: String,
        title: String,
    }

    // Generic: {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct Msg {
        message: String,
        detail: String,
        error: String,
    }

    if let Ok(tw) = serde_json::from_slice::<TwErrors>(body) {
        if let Some(first) = tw.errors.into_iter().next() {
            for candidate in [first.message, first.detail, first.title] {
                if !candidate.is_empty() {
                    return candidate;
                }
            }
        }
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        for candidate in [m.message, m.detail, m.error] {
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }
    snip_body(body)
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }
    HeaderValue::from_str(&format!("Bearer {}", s))
        .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_quotes_and_whitespace() {
        assert_eq!(sanitize_api_key("  \"abc def\"\n").unwrap(), "abcdef");
        assert!(sanitize_api_key("k\u{00e9}y").is_err());
    }

    #[test]
    fn error_message_prefers_platform_shape() {
        let body = br#"{"errors":[{"message":"","detail":"Rate limit exceeded","title":"Too Many Requests"}]}"#;
        assert_eq!(extract_error_message(body), "Rate limit exceeded");

        let generic = br#"{"error":"nope"}"#;
        assert_eq!(extract_error_message(generic), "nope");

        let opaque = b"<html>weird</html>";
        assert_eq!(extract_error_message(opaque), "<html>weird</html>");
    }

    #[test]
    fn query_redaction_masks_secrets_only() {
        let q: Vec<(&str, Cow<'_, str>)> = vec![
            ("query", Cow::Borrowed("rustlang")),
            ("api_key", Cow::Borrowed("s3cret")),
        ];
        let red = redact_query(Some(&q));
        assert_eq!(red[0], ("query".to_string(), "rustlang".to_string()));
        assert_eq!(red[1], ("api_key".to_string(), "<redacted>".to_string()));
    }
}
