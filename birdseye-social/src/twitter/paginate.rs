//! Cursor pagination shared by the list-returning endpoints.
//!
//! The platform hands back a `meta.next_token` pointer with every page;
//! [`collect_items`] follows it until the requested item count is reached or
//! the cursor is exhausted, then truncates the final page so callers get at
//! most `limit` items.
use anyhow::Result;
use std::future::Future;

/// Accumulate up to `limit` items by repeatedly calling `fetch_page` with the
/// previous page's cursor token.
///
/// `fetch_page` receives `None` on the first call and must return the page's
/// items together with the next cursor, if any. An empty page ends the loop
/// even when a token is present, so a misbehaving endpoint cannot spin us
/// forever.
pub async fn collect_items<T, F, Fut>(limit: usize, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>)>>,
{
    let mut items: Vec<T> = Vec::new();
    let mut token: Option<String> = None;

    while items.len() < limit {
        let (page, next) = fetch_page(token.take()).await?;
        if page.is_empty() {
            break;
        }
        items.extend(page);
        match next {
            Some(t) => token = Some(t),
            None => break,
        }
    }

    items.truncate(limit);
    Ok(items)
}
