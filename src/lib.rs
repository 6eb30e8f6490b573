//! Market-Crawler: MQL5 marketplace listing scraper
//!
//! This crate fetches paginated product listings from the MQL5 market,
//! extracts product cards, groups them by author and renders a static
//! HTML report.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Market-Crawler operations
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to parse {url}: {source}")]
    Parse { url: String, source: ParseError },

    #[error("Failed to fetch {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Errors raised while extracting product cards from a listing page
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("product card {index} is missing {field}")]
    MissingField { field: &'static str, index: usize },

    #[error("product card {index} has a non-numeric price '{raw}'")]
    InvalidPrice { raw: String, index: usize },

    #[error("product card {index} has an unusable link '{href}'")]
    InvalidLink { href: String, index: usize },

    #[error("invalid selector '{css}': {message}")]
    Selector { css: &'static str, message: String },
}

/// Result type alias for Market-Crawler operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, CrawlOutcome, ProductRecord};
pub use output::{group_by_author, AuthorGroup, AuthorGroups};
