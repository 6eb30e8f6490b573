//! Output module for grouping and reporting crawl results
//!
//! This module handles:
//! - Grouping records by author
//! - Rendering the HTML report
//! - Exporting records as JSON
//! - Summarizing run statistics

mod group;
mod html;
mod json;
pub mod stats;

pub use group::{group_by_author, AuthorGroup, AuthorGroups};
pub use html::{escape_html, format_html_report, generate_html_report};
pub use json::write_json_records;
pub use stats::{print_statistics, RunStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
