//! Stock screen records
//!
//! StockRecord is the typed form of one scanner row.
//! Direction selects which side of the daily move a screen ranks.

use rust_decimal::Decimal;
use std::fmt;

/// Which end of the percent-change ranking to screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// change > 0, sorted descending
    Gainers,
    /// change < 0, sorted ascending
    Losers,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Gainers, Direction::Losers];

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Gainers => "gainers",
            Direction::Losers => "losers",
        }
    }

    /// Scanner comparison operator applied to `change` against zero
    pub fn comparison(&self) -> &'static str {
        match self {
            Direction::Gainers => "greater",
            Direction::Losers => "less",
        }
    }

    /// Scanner sort order for `change`
    pub fn sort_order(&self) -> &'static str {
        match self {
            Direction::Gainers => "desc",
            Direction::Losers => "asc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One ranked stock from a market screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    /// Exchange ticker, the join key against the instrument directory
    pub ticker: String,
    /// Company name
    pub name: String,
    /// Last close price
    pub price: Decimal,
    /// Daily change in percent (signed)
    pub change_percent: Decimal,
    /// Daily change in price units (signed)
    pub change_value: Decimal,
    /// Daily volume
    pub volume: Decimal,
    /// Sector, when the scanner reports one
    pub sector: Option<String>,
    /// Analyst recommendation score, when reported
    pub rating: Option<Decimal>,
    /// Market capitalization, when reported
    pub market_cap: Option<Decimal>,
}

impl StockRecord {
    /// Tab-separated report row in header order
    ///
    /// Field values never carry tabs or line breaks into the row.
    pub fn to_row(&self) -> String {
        let sector = self.sector.as_deref().unwrap_or("");
        [
            sanitize(&self.name),
            sanitize(&self.ticker),
            self.price.normalize().to_string(),
            self.change_percent.normalize().to_string(),
            self.change_value.normalize().to_string(),
            self.volume.normalize().to_string(),
            sanitize(sector),
        ]
        .join("\t")
    }
}

/// Replace field separators so a value stays inside its column
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
