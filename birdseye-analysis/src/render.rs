//! Text rendering for frames: aligned tables, sparkline time series, and
//! CSV/JSON export.
use crate::frame::{Metric, PostFrame};
use time::format_description::well_known::Rfc3339;

const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const TEXT_COL_WIDTH: usize = 48;

/// Render the frame as an aligned text table, at most `limit` rows.
pub fn render_table(frame: &PostFrame, limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:<20} {:>6} {:>8} {:>5} {:>5}  {}\n",
        "id", "created_at", "likes", "reposts", "sent", "len", "text"
    ));

    for row in frame.rows().iter().take(limit) {
        let when = row
            .created_at
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| "-".into());
        out.push_str(&format!(
            "{:<20} {:<20} {:>6} {:>8} {:>5} {:>5}  {}\n",
            truncate(&row.id, 20),
            truncate(&when, 20),
            row.likes,
            row.reposts,
            row.sentiment,
            row.len,
            truncate(&row.text.replace('\n', " "), TEXT_COL_WIDTH),
        ));
    }
    out
}

/// Summary block: row count, mean length, engagement maxima, sentiment mix.
pub fn render_summary(frame: &PostFrame) -> String {
    let (neg, neu, pos) = frame.sentiment_breakdown();
    format!(
        "rows: {}\nmean len: {:.1}\nmax likes: {}\nmax reposts: {}\nsentiment -/0/+: {}/{}/{}\n",
        frame.len(),
        frame.mean_len(),
        frame.max_likes().map_or("-".into(), |v| v.to_string()),
        frame.max_reposts().map_or("-".into(), |v| v.to_string()),
        neg,
        neu,
        pos,
    )
}

/// One sparkline per metric, layered over the same time axis.
pub fn render_series(frame: &PostFrame, metrics: &[Metric]) -> String {
    let mut out = String::new();
    for &metric in metrics {
        let points = frame.series(metric);
        let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
        if values.is_empty() {
            out.push_str(&format!("{:<9} (no dated rows)\n", metric.label()));
            continue;
        }
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        out.push_str(&format!(
            "{:<9} {} [{:.0}..{:.0}]\n",
            metric.label(),
            sparkline(&values),
            min,
            max
        ));
    }
    out
}

/// Map values onto eighth-block characters, scaled to the series range.
pub fn sparkline(values: &[f64]) -> String {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|v| {
            let idx = if span <= f64::EPSILON {
                0
            } else {
                (((v - min) / span) * (SPARK_BLOCKS.len() - 1) as f64).round() as usize
            };
            SPARK_BLOCKS[idx.min(SPARK_BLOCKS.len() - 1)]
        })
        .collect()
}

/// Export the frame as CSV with a header row.
pub fn to_csv(frame: &PostFrame) -> String {
    let mut out = String::from("id,text,len,created_at,source,likes,reposts,sentiment\n");
    for row in frame.rows() {
        let when = row
            .created_at
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            csv_field(&row.id),
            csv_field(&row.text),
            row.len,
            when,
            csv_field(row.source.as_deref().unwrap_or("")),
            row.likes,
            row.reposts,
            row.sentiment,
        ));
    }
    out
}

/// Export the frame as a JSON array of row objects.
pub fn to_json(frame: &PostFrame) -> serde_json::Result<String> {
    serde_json::to_string_pretty(frame.rows())
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PostFrame;
    use crate::sentiment::SentimentAnalyzer;
    use birdseye_social::twitter::extract::Post;
    use time::macros::datetime;

    fn frame() -> PostFrame {
        let posts = vec![
            Post {
                id: "1".into(),
                text: "a good, \"quoted\" day".into(),
                author_handle: None,
                author_display_name: None,
                lang: None,
                created_at: Some(datetime!(2025-08-01 10:00 UTC)),
                source: Some("Twitter Web App".into()),
                like_count: 3,
                repost_count: 1,
                reply_count: 0,
                quote_count: 0,
                mentions: Vec::new(),
                hashtags: Vec::new(),
                urls: Vec::new(),
            },
            Post {
                id: "2".into(),
                text: "plain".into(),
                author_handle: None,
                author_display_name: None,
                lang: None,
                created_at: Some(datetime!(2025-08-01 11:00 UTC)),
                source: None,
                like_count: 9,
                repost_count: 4,
                reply_count: 0,
                quote_count: 0,
                mentions: Vec::new(),
                hashtags: Vec::new(),
                urls: Vec::new(),
            },
        ];
        PostFrame::from_posts(&posts, &SentimentAnalyzer::new())
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        let line = sparkline(&[0.0, 5.0, 10.0]);
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars.first(), Some(&'▁'));
        assert_eq!(chars.last(), Some(&'█'));
        assert_eq!(chars.len(), 3);
    }

    #[test]
    fn sparkline_of_constant_series_is_flat() {
        assert_eq!(sparkline(&[2.0, 2.0, 2.0]), "▁▁▁");
    }

    #[test]
    fn csv_quotes_fields_with_commas_and_quotes() {
        let csv = to_csv(&frame());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,text,len,created_at,source,likes,reposts,sentiment"
        );
        let first = lines.next().unwrap();
        assert!(first.contains("\"a good, \"\"quoted\"\" day\""));
        assert!(first.ends_with(",1")); // positive sentiment column
    }

    #[test]
    fn table_and_summary_render_all_rows() {
        let f = frame();
        let table = render_table(&f, 10);
        assert_eq!(table.lines().count(), 3); // header + 2 rows
        let summary = render_summary(&f);
        assert!(summary.contains("rows: 2"));
        assert!(summary.contains("max likes: 9"));
    }

    #[test]
    fn series_renders_one_line_per_metric() {
        let out = render_series(&frame(), &[Metric::Likes, Metric::Reposts]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.starts_with("likes"));
    }
}
