//! Upstream data sources
//!
//! - directory: brokerage instrument list (GET, bearer token)
//! - scanner: ranked market screens (POST, fixed filter body)
//! - parsing: scanner row schema and decoding

pub mod directory;
pub mod parsing;
pub mod scanner;

pub use directory::{DirectoryError, InstrumentDirectory};
pub use parsing::{decode_row, ScanColumn, COLUMNS};
pub use scanner::{MarketScanner, ScanError, ScanRequest, ScanResponse, ScanRow};

/// Longest response excerpt carried in a parse error
const PAYLOAD_EXCERPT: usize = 512;

/// Build the HTTP client shared by all sources
///
/// Timeouts are applied per request, since each source has its own.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("market-movers/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Response body excerpt for error messages
fn excerpt(body: &str) -> String {
    if body.len() <= PAYLOAD_EXCERPT {
        return body.to_string();
    }
    let mut end = PAYLOAD_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
