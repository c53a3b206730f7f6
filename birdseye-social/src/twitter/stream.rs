//! Filtered-stream runner and the listener callback surface.
//!
//! The platform keeps the HTTP connection open and emits one JSON record per
//! line, with bare newlines as keep-alives. [`run_filtered_stream`] frames
//! the byte stream into lines and hands each record to a [`StreamListener`].
//! There is no reconnect machinery: a rate-limited connect stops cleanly,
//! any other failure surfaces to the caller.
use crate::twitter::types::StreamEvent;
use crate::twitter::TwitterApi;
use anyhow::{Context, Result};
use futures::{Stream, StreamExt};
use reqwest::StatusCode;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Whether the stream should keep running after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerFlow {
    Continue,
    Stop,
}

/// Callback object invoked once per incoming real-time record.
#[async_trait::async_trait]
pub trait StreamListener: Send {
    /// Called with the raw JSON line exactly as the platform sent it.
    async fn on_record(&mut self, raw: &str) -> ListenerFlow;

    /// Called when the connect attempt is rejected with an HTTP status.
    /// The default stops on rate limiting and keeps going otherwise.
    fn on_status(&mut self, status: StatusCode) -> ListenerFlow {
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(%status, "stream rate limited, stopping");
            return ListenerFlow::Stop;
        }
        tracing::warn!(%status, "stream connect rejected");
        ListenerFlow::Continue
    }
}

/// Default listener: echo each record to stdout and append it to a UTF-8
/// text file, one record per line.
///
/// The file is reopened for append on every record, so the sink can be
/// rotated or deleted mid-run; a failed write is logged and the stream
/// keeps running.
pub struct FileSinkListener {
    path: PathBuf,
    echo: bool,
}

impl FileSinkListener {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            echo: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.echo = false;
        self
    }

    fn append_line(&self, raw: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{raw}")
    }
}

#[async_trait::async_trait]
impl StreamListener for FileSinkListener {
    async fn on_record(&mut self, raw: &str) -> ListenerFlow {
        if self.echo {
            println!("{raw}");
        }
        if let Ok(event) = serde_json::from_str::<StreamEvent>(raw) {
            let tags: Vec<&str> = event
                .matching_rules
                .iter()
                .flatten()
                .filter_map(|r| r.tag.as_deref())
                .collect();
            tracing::debug!(id = %event.data.id, rules = ?tags, "stream record");
        }
        if let Err(e) = self.append_line(raw) {
            tracing::warn!(path=%self.path.display(), error=%e, "stream sink write failed");
        }
        ListenerFlow::Continue
    }
}

/// Connect to the filtered stream and feed records to `listener` until the
/// listener stops, the server closes the connection, or transport fails.
///
/// Returns the number of records delivered.
pub async fn run_filtered_stream(
    api: &TwitterApi,
    listener: &mut dyn StreamListener,
) -> Result<u64> {
    let resp = match api.open_stream().await {
        Ok(resp) => resp,
        Err(e) => {
            if let Some(status) = e.status() {
                if listener.on_status(status) == ListenerFlow::Stop {
                    return Ok(0);
                }
            }
            return Err(e).context("filtered stream connect failed");
        }
    };

    let body = std::pin::pin!(resp.bytes_stream());
    pump_lines(body, listener).await
}

/// Frame a chunked byte stream into newline-delimited records and feed each
/// one to `listener`. Records may be split across chunks; `\r\n` endings are
/// normalized and bare newlines (keep-alive heartbeats) are skipped. A final
/// unterminated line left when the server closes the connection is delivered
/// as a record rather than dropped.
async fn pump_lines<S, B, E>(mut body: S, listener: &mut dyn StreamListener) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut delivered = 0u64;
    let mut buf: Vec<u8> = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = chunk.context("filtered stream read failed")?;
        buf.extend_from_slice(chunk.as_ref());

        while let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line[..line.len() - 1]);
            let line = line.trim_end_matches('\r');
            // Bare newlines are keep-alive heartbeats.
            if line.trim().is_empty() {
                continue;
            }

            delivered += 1;
            if listener.on_record(line).await == ListenerFlow::Stop {
                tracing::info!(delivered, "stream stopped by listener");
                return Ok(delivered);
            }
        }
    }

    let tail = String::from_utf8_lossy(&buf);
    let tail = tail.trim_end_matches('\r');
    if !tail.trim().is_empty() {
        delivered += 1;
        let _ = listener.on_record(tail).await;
    }

    tracing::info!(delivered, "stream closed by server");
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn file_sink_appends_one_record_per_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tweets.jsonl");
        let mut sink = FileSinkListener::new(&path).quiet();

        assert_eq!(
            sink.on_record(r#"{"data":{"id":"1","text":"hi"}}"#).await,
            ListenerFlow::Continue
        );
        assert_eq!(
            sink.on_record(r#"{"data":{"id":"2","text":"yo"}}"#).await,
            ListenerFlow::Continue
        );

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"id\":\"1\""));
        assert!(lines[1].contains("\"id\":\"2\""));
    }

    #[tokio::test]
    async fn file_sink_survives_unwritable_path() {
        // Points at a directory, so the append must fail; the listener still
        // asks to continue.
        let tmp = TempDir::new().unwrap();
        let mut sink = FileSinkListener::new(tmp.path()).quiet();
        assert_eq!(sink.on_record("{}").await, ListenerFlow::Continue);
    }

    struct Recorder {
        records: Vec<String>,
        stop_after: Option<usize>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                records: Vec::new(),
                stop_after: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl StreamListener for Recorder {
        async fn on_record(&mut self, raw: &str) -> ListenerFlow {
            self.records.push(raw.to_string());
            match self.stop_after {
                Some(n) if self.records.len() >= n => ListenerFlow::Stop,
                _ => ListenerFlow::Continue,
            }
        }
    }

    fn chunks(parts: &[&str]) -> Vec<std::io::Result<Vec<u8>>> {
        parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect()
    }

    #[test]
    fn default_status_policy_stops_only_on_rate_limit() {
        let mut listener = Recorder::new();
        assert_eq!(
            listener.on_status(StatusCode::TOO_MANY_REQUESTS),
            ListenerFlow::Stop
        );
        assert_eq!(
            listener.on_status(StatusCode::FORBIDDEN),
            ListenerFlow::Continue
        );
    }

    #[tokio::test]
    async fn frames_records_split_across_chunks() {
        let body = futures::stream::iter(chunks(&["{\"a\"", ":1}\n{\"b\"", ":2}\n"]));
        let mut listener = Recorder::new();
        let delivered = pump_lines(body, &mut listener).await.unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(listener.records, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[tokio::test]
    async fn strips_crlf_and_skips_keepalives() {
        let body = futures::stream::iter(chunks(&["{\"a\":1}\r\n", "\r\n\n", "{\"b\":2}\n"]));
        let mut listener = Recorder::new();
        let delivered = pump_lines(body, &mut listener).await.unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(listener.records, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[tokio::test]
    async fn trailing_unterminated_line_is_delivered_on_close() {
        let body = futures::stream::iter(chunks(&["{\"a\":1}\n\n{\"b\":2}"]));
        let mut listener = Recorder::new();
        let delivered = pump_lines(body, &mut listener).await.unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(listener.records, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[tokio::test]
    async fn listener_stop_ends_the_stream() {
        let body = futures::stream::iter(chunks(&["{\"a\":1}\n{\"b\":2}\n{\"c\":3}\n"]));
        let mut listener = Recorder::new();
        listener.stop_after = Some(2);
        let delivered = pump_lines(body, &mut listener).await.unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(listener.records.len(), 2);
    }

    #[tokio::test]
    async fn transport_error_surfaces() {
        let body = futures::stream::iter(vec![
            Ok(b"{\"a\":1}\n".to_vec()),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let mut listener = Recorder::new();
        let err = pump_lines(body, &mut listener).await.unwrap_err();
        assert!(err.to_string().contains("read failed"));
        // The record framed before the failure still reached the listener.
        assert_eq!(listener.records, vec![r#"{"a":1}"#]);
    }
}
