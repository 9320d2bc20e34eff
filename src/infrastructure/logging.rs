//! Logging setup
//!
//! Console output always; a daily-rolling JSON file under the configured
//! directory when one is set. Events are tagged with the stage target:
//! `directory`, `scanner`, `report` or `pipeline`.

use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::config::LoggingConfig;

/// Initialize logging
///
/// `RUST_LOG` wins over `config.level`. Returns the WorkerGuards which must
/// be kept alive for the duration of the program so buffered lines are flushed.
pub fn init_logging(config: &LoggingConfig) -> std::io::Result<Vec<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut guards = Vec::new();

    let file_layer = match &config.directory {
        Some(dir) => {
            let (appender, guard) = create_appender(dir, "market-movers")?;
            guards.push(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .json(),
            )
        }
        None => None,
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    if let Some(dir) = &config.directory {
        tracing::info!("Logging to console and {}", dir.display());
    }

    Ok(guards)
}

/// Create a rolling file appender, creating the directory if needed
fn create_appender(dir: &Path, name: &str) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, dir, name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    Ok((non_blocking, guard))
}
