//! Daily market movers report
//!
//! Intersects ranked gainer/loser screens from a market scanner with the
//! instruments tradable at a brokerage and writes tab-separated reports.

pub mod core;
pub mod infrastructure;
pub mod pipeline;
pub mod report;
pub mod sources;

// Re-export commonly used types
pub use infrastructure::config::Config;
pub use pipeline::{Pipeline, ReportOutcome, RunSummary};

use thiserror::Error;

/// Main error type
#[derive(Error, Debug)]
pub enum MoversError {
    #[error("Instrument directory unavailable: {0}")]
    Directory(#[from] sources::DirectoryError),

    #[error("Market scanner unavailable: {0}")]
    Scanner(#[from] sources::ScanError),

    #[error("Configuration error: {0}")]
    Config(#[from] infrastructure::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MoversError>;
