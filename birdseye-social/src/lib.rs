//! Social network client used by birdseye.
//!
//! Only the Twitter/X pipeline is implemented: a thin v2 API client with
//! cursor pagination, filtered streaming, and helpers that flatten raw
//! responses into [`twitter::extract::Post`] records for analysis.
pub mod twitter;
