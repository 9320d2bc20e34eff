//! Daily market movers report
//!
//! # Architecture
//! - **core**: Instruments, stock records, ticker intersection
//! - **sources**: Brokerage directory and market scanner clients
//! - **report**: Tab-separated report files
//! - **pipeline**: One-shot run wiring the above together
//! - **infrastructure**: Config and logging

use anyhow::Context;
use market_movers::infrastructure::{init_logging, Config};
use market_movers::Pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    // Guards flush the file log on drop
    let _guards = init_logging(&config.logging).context("Failed to initialize logging")?;

    let pipeline = Pipeline::new(&config)?;
    let summary = pipeline.run().await.inspect_err(|e| {
        tracing::error!(target: "pipeline", "Run aborted: {}", e);
    })?;

    for outcome in summary.reports.iter().filter(|r| !r.is_written()) {
        tracing::warn!(
            target: "pipeline",
            "{} report not written to {}",
            outcome.direction,
            outcome.path.display()
        );
    }

    Ok(())
}
