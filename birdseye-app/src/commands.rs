//! CLI surface and subcommand bodies.
//!
//! Every subcommand resolves credentials from the loaded config, builds a
//! [`TwitterApi`], and reports through stdout; structured diagnostics go to
//! the tracing sink.
use anyhow::{bail, Context, Result};
use birdseye_analysis::{render, Metric, PostFrame, SentimentAnalyzer};
use birdseye_common::OutputFormat;
use birdseye_config::BirdseyeConfig;
use birdseye_social::twitter::extract::{posts_from_page, Post};
use birdseye_social::twitter::stream::{run_filtered_stream, FileSinkListener};
use birdseye_social::twitter::TwitterApi;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "birdseye", about = "Fetch, stream, and analyse posts from Twitter/X")]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "birdseye.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a user's posts (or their home timeline) as a table.
    Timeline {
        /// Handle to fetch; falls back to `twitter.default_user` in config.
        #[arg(long)]
        user: Option<String>,
        /// Fetch the reverse-chronological home timeline instead of the
        /// user's own posts.
        #[arg(long)]
        home: bool,
        /// Total posts to collect across pages.
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// List accounts a user follows.
    Following {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Search recent posts matching a query.
    Search {
        query: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Run the filtered stream and append raw records to a file.
    Stream {
        /// Keyword rule; repeatable. Falls back to `stream.rules` in config.
        #[arg(long = "rule")]
        rules: Vec<String>,
        /// Output file; falls back to `stream.output_file` in config.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Summary statistics and sparkline time series for a user's posts.
    Report {
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        /// Metric to chart; repeatable for layered series.
        #[arg(long = "metric")]
        metrics: Vec<Metric>,
    },
}

pub async fn run(cli: Cli, cfg: BirdseyeConfig) -> Result<()> {
    let api = TwitterApi::new(cfg.twitter.bearer_token.clone());

    match cli.command {
        Command::Timeline {
            user,
            home,
            limit,
            format,
        } => {
            let handle = resolve_user(user, &cfg)?;
            let limit = limit.unwrap_or(cfg.fetch.max_items);
            let user = api.lookup_user(&handle).await?;
            tracing::info!(%handle, user_id = %user.id, home, limit, "timeline fetch");

            let posts = if home {
                api.home_timeline(&user.id, limit, cfg.fetch.page_size).await?
            } else {
                api.user_timeline(&user.id, limit, cfg.fetch.page_size).await?
            };
            emit_posts(posts, format)
        }

        Command::Following { user, limit } => {
            let handle = resolve_user(user, &cfg)?;
            let limit = limit.unwrap_or(cfg.fetch.max_items);
            let user = api.lookup_user(&handle).await?;

            let followed = api.following(&user.id, limit, cfg.fetch.page_size).await?;
            for account in &followed {
                println!(
                    "@{:<16} {}",
                    account.username,
                    account.name.as_deref().unwrap_or("")
                );
            }
            println!("({} accounts)", followed.len());
            Ok(())
        }

        Command::Search {
            query,
            limit,
            format,
        } => {
            tracing::info!(query, "recent search");
            let page = api.recent_search(query, limit).await?;
            emit_posts(posts_from_page(page), format)
        }

        Command::Stream { rules, out } => {
            let keywords = if rules.is_empty() {
                cfg.stream.rules.clone()
            } else {
                rules
            };
            if keywords.is_empty() {
                bail!("no stream rules given: pass --rule or set stream.rules in config");
            }

            let installed = api.replace_stream_rules(&keywords).await?;
            tracing::info!(rules = installed.len(), "stream rules installed");

            let sink = out.unwrap_or_else(|| PathBuf::from(&cfg.stream.output_file));
            println!("streaming into {} (ctrl-c to quit)", sink.display());
            let mut listener = FileSinkListener::new(&sink);
            let delivered = run_filtered_stream(&api, &mut listener)
                .await
                .context("filtered stream failed")?;
            println!("stream ended after {delivered} records");
            Ok(())
        }

        Command::Report {
            user,
            limit,
            metrics,
        } => {
            let handle = resolve_user(user, &cfg)?;
            let limit = limit.unwrap_or(cfg.fetch.max_items);
            let user = api.lookup_user(&handle).await?;

            let posts = api.user_timeline(&user.id, limit, cfg.fetch.page_size).await?;
            let frame = PostFrame::from_posts(&posts, &SentimentAnalyzer::new());

            let metrics = if metrics.is_empty() {
                vec![Metric::Likes, Metric::Reposts]
            } else {
                metrics
            };

            print!("{}", render::render_summary(&frame));
            println!();
            print!("{}", render::render_series(&frame, &metrics));
            Ok(())
        }
    }
}

fn resolve_user(cli_user: Option<String>, cfg: &BirdseyeConfig) -> Result<String> {
    cli_user
        .or_else(|| cfg.twitter.default_user.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no user given: pass --user or set twitter.default_user in config")
        })
}

fn emit_posts(posts: Vec<Post>, format: OutputFormat) -> Result<()> {
    let frame = PostFrame::from_posts(&posts, &SentimentAnalyzer::new());
    match format {
        OutputFormat::Table => {
            print!("{}", render::render_table(&frame, frame.len()));
            println!();
            print!("{}", render::render_summary(&frame));
        }
        OutputFormat::Json => println!("{}", render::to_json(&frame)?),
        OutputFormat::Csv => print!("{}", render::to_csv(&frame)),
    }
    Ok(())
}
