//! Report pipeline
//!
//! Directory fetch, then both screens, then one report per direction.
//! Fetch and decode failures abort the run before any report is touched;
//! a report that cannot be written is logged and the run carries on.

use crate::core::{intersect, Direction, InstrumentSet, StockRecord};
use crate::infrastructure::config::{Config, OutputConfig};
use crate::report::{Report, ReportError};
use crate::sources::{http_client, InstrumentDirectory, MarketScanner, ScanError};
use crate::{MoversError, Result};
use std::path::{Path, PathBuf};

/// One-shot gainers/losers report run
pub struct Pipeline {
    directory: InstrumentDirectory,
    scanner: MarketScanner,
    output: OutputConfig,
    concurrent_screens: bool,
}

/// What happened to one report
#[derive(Debug)]
pub struct ReportOutcome {
    pub direction: Direction,
    pub path: PathBuf,
    /// Rows returned by the scanner
    pub received: usize,
    /// Rows left after the tradability filter
    pub kept: usize,
    /// Set when the file could not be written
    pub error: Option<ReportError>,
}

impl ReportOutcome {
    pub fn is_written(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-direction outcomes of a completed run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<ReportOutcome>,
}

impl RunSummary {
    pub fn outcome(&self, direction: Direction) -> Option<&ReportOutcome> {
        self.reports.iter().find(|r| r.direction == direction)
    }

    pub fn all_written(&self) -> bool {
        self.reports.iter().all(ReportOutcome::is_written)
    }
}

impl Pipeline {
    /// Build a pipeline with its own HTTP client
    pub fn new(config: &Config) -> Result<Self> {
        let client = http_client().map_err(|e| MoversError::Http(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    /// Build a pipeline around an existing HTTP client
    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        if config.brokerage.token.is_empty() {
            tracing::warn!(target: "pipeline", "Brokerage token is empty");
        }

        Self {
            directory: InstrumentDirectory::new(client.clone(), &config.brokerage),
            scanner: MarketScanner::new(client, &config.scanner),
            output: config.output.clone(),
            concurrent_screens: config.pipeline.concurrent_screens,
        }
    }

    pub fn report_path(&self, direction: Direction) -> &Path {
        match direction {
            Direction::Gainers => &self.output.gainers_path,
            Direction::Losers => &self.output.losers_path,
        }
    }

    /// Run once: fetch, filter, write both reports
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!(target: "pipeline", "Starting gainers/losers run");

        let tradable = self.directory.fetch().await?;
        if tradable.is_empty() {
            tracing::warn!(target: "pipeline", "Instrument directory is empty, reports will be header-only");
        }

        let (gainers, losers) = self.fetch_screens().await?;

        let mut summary = RunSummary::default();
        for (direction, records) in [(Direction::Gainers, gainers), (Direction::Losers, losers)] {
            summary.reports.push(self.publish(direction, records, &tradable));
        }

        tracing::info!(
            target: "pipeline",
            "Run finished: {}/{} reports written",
            summary.reports.iter().filter(|r| r.is_written()).count(),
            summary.reports.len()
        );

        Ok(summary)
    }

    async fn fetch_screens(&self) -> std::result::Result<(Vec<StockRecord>, Vec<StockRecord>), ScanError> {
        if self.concurrent_screens {
            tokio::try_join!(
                self.scanner.fetch_records(Direction::Gainers),
                self.scanner.fetch_records(Direction::Losers)
            )
        } else {
            let gainers = self.scanner.fetch_records(Direction::Gainers).await?;
            let losers = self.scanner.fetch_records(Direction::Losers).await?;
            Ok((gainers, losers))
        }
    }

    fn publish(
        &self,
        direction: Direction,
        records: Vec<StockRecord>,
        tradable: &InstrumentSet,
    ) -> ReportOutcome {
        let received = records.len();
        let report = Report::new(direction, intersect(records, tradable));
        let path = self.report_path(direction).to_path_buf();

        tracing::info!(
            target: "pipeline",
            "{}: {} of {} rows tradable",
            direction,
            report.records.len(),
            received
        );

        let error = report.write_to(&path).err();
        if let Some(e) = &error {
            tracing::error!(target: "report", "Failed to write {} report: {}", direction, e);
        }

        ReportOutcome {
            direction,
            path,
            received,
            kept: report.records.len(),
            error,
        }
    }
}
