//! Brokerage instruments and the tradable ticker set

use serde::{Deserialize, Deserializer};
use std::collections::HashSet;

/// Instrument as listed by the brokerage directory
///
/// Only `ticker` is required; the rest default when the brokerage omits them
/// or sends null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub figi: String,
    pub ticker: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub isin: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_price_increment: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lot: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Tickers tradable at the brokerage
///
/// Built once per run, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentSet {
    tickers: HashSet<String>,
}

impl InstrumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, ticker: &str) -> bool {
        self.tickers.contains(ticker)
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

impl From<Vec<Instrument>> for InstrumentSet {
    fn from(instruments: Vec<Instrument>) -> Self {
        instruments.into_iter().map(|i| i.ticker).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for InstrumentSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tickers: iter.into_iter().map(Into::into).collect(),
        }
    }
}
