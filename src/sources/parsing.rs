//! Scanner row decoding
//!
//! A scanner row is a positional array aligned with the `columns` list of the
//! scan request. Both sides read the same `COLUMNS` table: the request sends
//! its field names, the decoder looks positions up in it, so the two cannot
//! drift apart.

use super::scanner::{ScanError, ScanRow};
use crate::core::StockRecord;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;

/// Columns requested from the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanColumn {
    Ticker,
    Close,
    Change,
    ChangeAbs,
    Rating,
    Volume,
    MarketCap,
    PriceEarnings,
    EarningsPerShare,
    Employees,
    Sector,
    Description,
    Name,
    Type,
    Subtype,
    UpdateMode,
    PriceScale,
    MinMov,
    Fractional,
    MinMove2,
}

impl ScanColumn {
    /// Scanner field name
    pub const fn field(&self) -> &'static str {
        match self {
            // The scanner calls the ticker "name" and the company name "description"
            ScanColumn::Ticker | ScanColumn::Name => "name",
            ScanColumn::Close => "close",
            ScanColumn::Change => "change",
            ScanColumn::ChangeAbs => "change_abs",
            ScanColumn::Rating => "Recommend.All",
            ScanColumn::Volume => "volume",
            ScanColumn::MarketCap => "market_cap_basic",
            ScanColumn::PriceEarnings => "price_earnings_ttm",
            ScanColumn::EarningsPerShare => "earnings_per_share_basic_ttm",
            ScanColumn::Employees => "number_of_employees",
            ScanColumn::Sector => "sector",
            ScanColumn::Description => "description",
            ScanColumn::Type => "type",
            ScanColumn::Subtype => "subtype",
            ScanColumn::UpdateMode => "update_mode",
            ScanColumn::PriceScale => "pricescale",
            ScanColumn::MinMov => "minmov",
            ScanColumn::Fractional => "fractional",
            ScanColumn::MinMove2 => "minmove2",
        }
    }

    /// Position of this column in every returned row
    pub fn position(&self) -> Option<usize> {
        COLUMNS.iter().position(|c| c == self)
    }
}

/// Requested column order; row values arrive in exactly this order
pub const COLUMNS: [ScanColumn; 20] = [
    ScanColumn::Ticker,
    ScanColumn::Close,
    ScanColumn::Change,
    ScanColumn::ChangeAbs,
    ScanColumn::Rating,
    ScanColumn::Volume,
    ScanColumn::MarketCap,
    ScanColumn::PriceEarnings,
    ScanColumn::EarningsPerShare,
    ScanColumn::Employees,
    ScanColumn::Sector,
    ScanColumn::Description,
    ScanColumn::Name,
    ScanColumn::Type,
    ScanColumn::Subtype,
    ScanColumn::UpdateMode,
    ScanColumn::PriceScale,
    ScanColumn::MinMov,
    ScanColumn::Fractional,
    ScanColumn::MinMove2,
];

/// Field names for the scan request body
pub fn column_fields() -> Vec<&'static str> {
    COLUMNS.iter().map(ScanColumn::field).collect()
}

/// Decode one scanner row into a StockRecord
///
/// Required columns must be present and of the expected type; there is no
/// defaulting. Rating, market cap and sector may be null.
pub fn decode_row(row: &ScanRow) -> Result<StockRecord, ScanError> {
    let reader = RowReader { row };

    Ok(StockRecord {
        ticker: reader.string(ScanColumn::Ticker)?,
        name: reader.string(ScanColumn::Description)?,
        price: reader.decimal(ScanColumn::Close)?,
        change_percent: reader.decimal(ScanColumn::Change)?,
        change_value: reader.decimal(ScanColumn::ChangeAbs)?,
        volume: reader.decimal(ScanColumn::Volume)?,
        sector: reader.optional_string(ScanColumn::Sector)?,
        rating: reader.optional_decimal(ScanColumn::Rating)?,
        market_cap: reader.optional_decimal(ScanColumn::MarketCap)?,
    })
}

/// Decode every row, failing on the first malformed one
pub fn decode_rows(rows: &[ScanRow]) -> Result<Vec<StockRecord>, ScanError> {
    rows.iter().map(decode_row).collect()
}

struct RowReader<'a> {
    row: &'a ScanRow,
}

impl<'a> RowReader<'a> {
    fn value(&self, column: ScanColumn) -> Result<Option<&'a Value>, ScanError> {
        let index = column
            .position()
            .ok_or_else(|| self.malformed(column, "column not requested".to_string()))?;
        Ok(self.row.values.get(index))
    }

    fn string(&self, column: ScanColumn) -> Result<String, ScanError> {
        self.optional_string(column)?
            .ok_or_else(|| self.malformed(column, "missing value".to_string()))
    }

    fn decimal(&self, column: ScanColumn) -> Result<Decimal, ScanError> {
        self.optional_decimal(column)?
            .ok_or_else(|| self.malformed(column, "missing value".to_string()))
    }

    fn optional_string(&self, column: ScanColumn) -> Result<Option<String>, ScanError> {
        match self.value(column)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.malformed(
                column,
                format!("expected string, got {}", kind(other)),
            )),
        }
    }

    fn optional_decimal(&self, column: ScanColumn) -> Result<Option<Decimal>, ScanError> {
        match self.value(column)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => to_decimal(n)
                .map(Some)
                .ok_or_else(|| self.malformed(column, format!("number {} out of range", n))),
            Some(other) => Err(self.malformed(
                column,
                format!("expected number, got {}", kind(other)),
            )),
        }
    }

    fn malformed(&self, column: ScanColumn, reason: String) -> ScanError {
        ScanError::MalformedRow {
            symbol: self.row.symbol.clone(),
            column: column.field(),
            reason,
        }
    }
}

/// Exact decimal from a JSON number's shortest textual form
fn to_decimal(n: &Number) -> Option<Decimal> {
    let text = n.to_string();
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(&text).ok()
    } else {
        Decimal::from_str(&text).ok()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
