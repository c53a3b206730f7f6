//! Common types and utilities shared across birdseye crates.
//!
//! This crate defines the shared error type, output-format selection, and the
//! observability helpers used by the CLI and integration tests. It is
//! intentionally lightweight so that every crate can depend on it without
//! pulling in heavy transitive costs.
//!
//! # Overview
//!
//! - [`BirdseyeError`] and [`Result`]: shared error handling
//! - [`OutputFormat`]: how reports and exports are rendered
//! - [`observability`]: centralised tracing/logging initialisation
use serde::{Deserialize, Serialize};

pub mod observability;

/// Preferred output format for reports and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = BirdseyeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(BirdseyeError::Config(format!(
                "unknown output format: {other} (expected table, json, or csv)"
            ))),
        }
    }
}

/// Error types used across the birdseye workspace.
#[derive(thiserror::Error, Debug)]
pub enum BirdseyeError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A referenced user could not be resolved to an id.
    #[error("User not found: {0}")]
    UserNotFound(String),
}

/// Convenient alias for results that use [`BirdseyeError`].
pub type Result<T> = std::result::Result<T, BirdseyeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(
            " table ".parse::<OutputFormat>().unwrap(),
            OutputFormat::Table
        );
        assert!("parquet".parse::<OutputFormat>().is_err());
    }
}
