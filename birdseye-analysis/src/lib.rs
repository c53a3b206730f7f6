//! Post-processing for fetched posts: sentiment tagging, tabulation, and
//! text charts.
//!
//! - [`sentiment`]: text cleaning and the three-way polarity sign
//! - [`frame`]: the in-memory post table with derived columns and summaries
//! - [`render`]: aligned tables, sparkline time series, CSV/JSON export
pub mod frame;
pub mod render;
pub mod sentiment;

pub use frame::{Metric, PostFrame, PostRow};
pub use sentiment::{SentimentAnalyzer, SentimentSign};
