//! Market Scanner
//!
//! Fetches ranked gainer/loser screens of US-listed equities.
//! One request per direction; the body differs only in the change
//! comparison and the sort order.

use super::parsing::{column_fields, decode_rows};
use crate::core::{Direction, StockRecord};
use crate::infrastructure::config::ScannerConfig;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Security types included in every screen
const SECURITY_TYPES: [&str; 3] = ["stock", "dr", "fund"];

/// Security subtypes included in every screen
const SECURITY_SUBTYPES: [&str; 8] = ["common", "", "etf", "unit", "mutual", "money", "reit", "trust"];

/// Market scanner client
pub struct MarketScanner {
    client: reqwest::Client,
    config: ScannerConfig,
}

impl MarketScanner {
    pub fn new(client: reqwest::Client, config: &ScannerConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    /// Fetch one ranked screen as raw rows
    ///
    /// API: POST <scanner.url> with the JSON body from `ScanRequest::new`
    pub async fn fetch(&self, direction: Direction) -> Result<Vec<ScanRow>, ScanError> {
        let url = self.config.url.as_str();
        let request = ScanRequest::new(direction, &self.config);

        tracing::info!(target: "scanner", "Fetching top {} from {}", direction, url);

        let response = self
            .client
            .post(url)
            .json(&request)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| ScanError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            return Err(ScanError::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ScanError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let scan: ScanResponse = serde_json::from_str(&body).map_err(|e| ScanError::Parse {
            url: url.to_string(),
            message: e.to_string(),
            payload: super::excerpt(&body),
        })?;

        tracing::info!(
            target: "scanner",
            "Received {} {} rows (total matching {})",
            scan.data.len(),
            direction,
            scan.total_count
        );

        Ok(scan.data)
    }

    /// Fetch one ranked screen and decode every row
    pub async fn fetch_records(&self, direction: Direction) -> Result<Vec<StockRecord>, ScanError> {
        let rows = self.fetch(direction).await?;
        decode_rows(&rows)
    }
}

// === API Request Types ===

/// Scan request body
#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    filter: Vec<FilterClause>,
    options: ScanOptions,
    symbols: SymbolQuery,
    columns: Vec<&'static str>,
    sort: SortSpec,
    range: [u32; 2],
}

#[derive(Debug, Clone, Serialize)]
struct FilterClause {
    left: &'static str,
    operation: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
struct ScanOptions {
    active_symbols_only: bool,
    lang: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct SymbolQuery {
    query: TypeQuery,
    tickers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct TypeQuery {
    types: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SortSpec {
    sort_by: &'static str,
    sort_order: &'static str,
}

impl FilterClause {
    fn new(left: &'static str, operation: &'static str, right: Option<Value>) -> Self {
        Self {
            left,
            operation,
            right,
        }
    }
}

impl ScanRequest {
    /// Build the screen request for one direction
    pub fn new(direction: Direction, config: &ScannerConfig) -> Self {
        Self {
            filter: vec![
                FilterClause::new("change", "nempty", None),
                FilterClause::new("type", "in_range", Some(json!(SECURITY_TYPES))),
                FilterClause::new("subtype", "in_range", Some(json!(SECURITY_SUBTYPES))),
                FilterClause::new("exchange", "in_range", Some(json!(config.exchanges))),
                FilterClause::new("change", direction.comparison(), Some(json!(0))),
                FilterClause::new(
                    "close",
                    "in_range",
                    Some(json!([config.min_price, config.max_price])),
                ),
            ],
            options: ScanOptions {
                active_symbols_only: true,
                lang: "en",
            },
            symbols: SymbolQuery {
                query: TypeQuery { types: Vec::new() },
                tickers: Vec::new(),
            },
            columns: column_fields(),
            sort: SortSpec {
                sort_by: "change",
                sort_order: direction.sort_order(),
            },
            range: [0, config.limit],
        }
    }
}

// === API Response Types ===

/// Scan response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub data: Vec<ScanRow>,
    #[serde(default)]
    pub total_count: i64,
}

/// One positional row, values ordered as `COLUMNS`
#[derive(Debug, Clone, Deserialize)]
pub struct ScanRow {
    /// Exchange-qualified symbol, e.g. "NASDAQ:AAPL"
    #[serde(rename = "s", default)]
    pub symbol: String,
    #[serde(rename = "d")]
    pub values: Vec<Value>,
}

/// Scanner errors
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Network error requesting {url}: {message}")]
    Network { url: String, message: String },

    #[error("Bad response code {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("Can't decode response from {url}: {message}; payload: {payload}")]
    Parse {
        url: String,
        message: String,
        payload: String,
    },

    #[error("Malformed row {symbol}: column '{column}': {reason}")]
    MalformedRow {
        symbol: String,
        column: &'static str,
        reason: String,
    },
}
