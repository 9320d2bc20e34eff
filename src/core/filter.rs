//! Intersection of a ranked screen with the tradable set

use super::{InstrumentSet, StockRecord};

/// Keep records whose ticker is tradable, in their original order
pub fn intersect(records: Vec<StockRecord>, tradable: &InstrumentSet) -> Vec<StockRecord> {
    records
        .into_iter()
        .filter(|r| tradable.contains(&r.ticker))
        .collect()
}
