//! Core domain types
//!
//! - Instrument / InstrumentSet: brokerage directory and tradable tickers
//! - StockRecord / Direction: ranked screen rows
//! - filter: ticker intersection of the two

pub mod filter;
pub mod instrument;
pub mod stock;

pub use filter::intersect;
pub use instrument::{Instrument, InstrumentSet};
pub use stock::{Direction, StockRecord};
