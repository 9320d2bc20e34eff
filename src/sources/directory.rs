//! Instrument Directory
//!
//! Fetches the list of instruments tradable at the brokerage.
//! Called once per run, before any screen is processed.

use crate::core::{Instrument, InstrumentSet};
use crate::infrastructure::config::BrokerageConfig;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Brokerage directory client
pub struct InstrumentDirectory {
    client: reqwest::Client,
    url: String,
    token: String,
    timeout: Duration,
}

impl InstrumentDirectory {
    pub fn new(client: reqwest::Client, config: &BrokerageConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
            timeout: config.timeout(),
        }
    }

    /// Fetch the tradable ticker set
    ///
    /// API: GET <brokerage.url> with `Authorization: Bearer <token>`
    /// Fails on transport errors, any status other than 200, an undecodable
    /// body, or a response whose `status` is not "OK" (case-insensitive).
    pub async fn fetch(&self) -> Result<InstrumentSet, DirectoryError> {
        let instruments = self.fetch_instruments().await?;
        Ok(InstrumentSet::from(instruments))
    }

    /// Fetch the full instrument list
    pub async fn fetch_instruments(&self) -> Result<Vec<Instrument>, DirectoryError> {
        tracing::info!(target: "directory", "Fetching instruments from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DirectoryError::Network {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            return Err(DirectoryError::Http {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| DirectoryError::Network {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        let stocks = parse_stocks_response(&body).map_err(|e| DirectoryError::Parse {
            url: self.url.clone(),
            message: e.to_string(),
            payload: super::excerpt(&body),
        })?;

        if !stocks.status.eq_ignore_ascii_case("ok") {
            return Err(DirectoryError::Status {
                status: stocks.status,
                tracking_id: stocks.tracking_id,
            });
        }

        let instruments = stocks.payload.instruments;
        tracing::info!(
            target: "directory",
            "Received {} instruments (reported total {})",
            instruments.len(),
            stocks.payload.total
        );

        Ok(instruments)
    }
}

fn parse_stocks_response(body: &str) -> serde_json::Result<StocksResponse> {
    serde_json::from_str(body)
}

// === API Response Types ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StocksResponse {
    #[serde(default)]
    tracking_id: String,
    status: String,
    #[serde(default)]
    payload: StocksPayload,
}

#[derive(Debug, Default, Deserialize)]
struct StocksPayload {
    #[serde(default)]
    instruments: Vec<Instrument>,
    #[serde(default)]
    total: i64,
}

/// Directory errors
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
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

    #[error("Directory request failed with status '{status}', trackingId '{tracking_id}'")]
    Status { status: String, tracking_id: String },
}
