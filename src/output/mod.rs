//! Output module for run reports
//!
//! This module handles:
//! - Run statistics and their console rendering
//! - The JSON dump of every harvested record
//! - The markdown run summary

mod json;
mod markdown;
pub mod stats;

pub use json::write_records_json;
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur when writing run outputs
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
