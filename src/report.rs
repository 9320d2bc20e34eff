//! Tab-separated screen reports
//!
//! One header line, then one line per stock in ranking order.

use crate::core::{Direction, StockRecord};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Report header, matching `StockRecord::to_row` column order
pub const HEADER: &str = "Name\tTicker\tPrice\tChangePercent\tChangeValue\tVolume\tSector";

/// Filtered screen ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub direction: Direction,
    pub records: Vec<StockRecord>,
}

impl Report {
    pub fn new(direction: Direction, records: Vec<StockRecord>) -> Self {
        Self { direction, records }
    }

    /// Header line followed by one row per record
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.records.len() + 1);
        lines.push(HEADER.to_string());
        lines.extend(self.records.iter().map(StockRecord::to_row));
        lines
    }

    /// Render and write to `path`
    pub fn write_to(&self, path: &Path) -> Result<usize, ReportError> {
        write_lines(&self.lines(), path)
    }
}

/// Write lines to a file, replacing its contents
///
/// Surrounding whitespace other than tabs is trimmed so empty leading or
/// trailing fields keep their separators. Blank lines are dropped, the rest
/// joined with `\n` without a trailing newline. Returns the number of lines written.
/// Not atomic: a failed write may leave a partial file behind.
pub fn write_lines<S: AsRef<str>>(lines: &[S], path: &Path) -> Result<usize, ReportError> {
    let kept: Vec<&str> = lines
        .iter()
        .map(|line| trim_line(line.as_ref()))
        .filter(|line| !line.is_empty())
        .collect();

    let mut file = File::create(path).map_err(|source| ReportError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    file.write_all(kept.join("\n").as_bytes())
        .and_then(|_| file.flush())
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(target: "report", "Wrote {} lines to {}", kept.len(), path.display());

    Ok(kept.len())
}

fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c != '\t' && c.is_whitespace())
}

/// Report writing errors
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Error creating {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error writing to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub fn path(&self) -> &Path {
        match self {
            ReportError::Create { path, .. } | ReportError::Write { path, .. } => path,
        }
    }
}
